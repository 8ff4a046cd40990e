use newsdesk_core::Article;
use newsdesk_engine::Navigator;

use super::render;

/// Article detail route: prints the full article to stdout.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn open(&self, article: Article, category_color: &'static str) {
        println!("{}", render::article(&article, category_color));
    }
}
