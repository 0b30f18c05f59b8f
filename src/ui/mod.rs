pub mod info;
pub mod keybar;
pub mod layout;
pub mod leaderboard;
pub mod question;
pub mod status;
pub mod statusbar;
pub mod titlebar;

use ratatui::Frame;

use crate::screen::{Panel, Screen};

pub fn draw(f: &mut Frame, screen: &Screen) {
    let layout = layout::compute_layout(f.area());

    titlebar::draw_titlebar(f, layout.titlebar, screen);
    match screen.panel {
        Panel::Status => status::draw_status(f, layout.main, screen),
        Panel::Info => info::draw_info(f, layout.main, screen),
        Panel::Question => question::draw_question(f, layout.main, screen),
        Panel::Leaderboard => leaderboard::draw_leaderboard(f, layout.main, screen),
    }
    statusbar::draw_statusbar(f, layout.statusbar, screen);
    keybar::draw_keybar(f, layout.keybar, screen);
}
