/// Query sent to the generator for one topic. Asks for the block format the
/// record parser understands.
pub fn briefing_query(topic: &str, delimiter: &str) -> String {
    format!(
        "Summarize the top 5 news stories from the last 24 hours about {topic}. Include links.\n\
         Format every story exactly like this:\n\
         ### [Headline](https://link.to/the/story)\n\
         Summary: two or three sentences.\n\
         Separate stories with a line containing only {delimiter}"
    )
}
