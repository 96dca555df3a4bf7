pub mod html;
pub mod theme;

pub use html::{HtmlRenderer, RenderOptions};
pub use theme::Theme;

pub mod prelude {
    pub use super::html::{HtmlRenderer, RenderOptions};
    pub use super::theme::Theme;
    pub use brief_core::{Renderer, Result, Error};
}
