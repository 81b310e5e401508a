// Fixed-page layout for exported resumes.
// Static font metrics decide line wraps; pagination pours lines into US letter pages.

pub mod font_metrics;
pub mod pagination;

pub use font_metrics::{letter_page_config, FontFamily, PageConfig};
pub use pagination::{heading_scale, paginate, Page, PageLine, BULLET_INDENT_EM};
