//! Keyword analysis — topic → ranked SEO keyword insights.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
