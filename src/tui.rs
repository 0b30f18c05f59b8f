use std::io;
use std::sync::mpsc;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::app::{Activity, LiveRuntime};
use crate::gateway::Delivery;
use crate::screen::{Action, Panel};
use crate::timer::TimerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Act(Action),
}

pub fn run_tui(
    mut activity: Activity,
    mut runtime: LiveRuntime,
    timer_rx: mpsc::Receiver<TimerEvent>,
    net_rx: mpsc::Receiver<Delivery>,
) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Cannot enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Cannot enter alternate screen: {}", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Cannot create terminal: {}", e))?;

    activity.start(&mut runtime);

    let result = main_loop(&mut terminal, &mut activity, &mut runtime, &timer_rx, &net_rx);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    activity: &mut Activity,
    runtime: &mut LiveRuntime,
    timer_rx: &mpsc::Receiver<TimerEvent>,
    net_rx: &mpsc::Receiver<Delivery>,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|f| crate::ui::draw(f, activity.screen()))
            .map_err(|e| format!("Draw error: {}", e))?;

        // Poll for input events
        if event::poll(Duration::from_millis(50)).map_err(|e| format!("Poll error: {}", e))? {
            if let Event::Key(key) = event::read().map_err(|e| format!("Read error: {}", e))? {
                if key.kind == KeyEventKind::Press {
                    match map_key(key, activity.screen().panel) {
                        Some(Input::Quit) => {
                            info!("quit requested");
                            break;
                        }
                        Some(Input::Act(action)) => activity.handle(action, runtime),
                        None => {}
                    }
                }
            }
        }

        // Timer ticks run one at a time, in order
        while let Ok(ev) = timer_rx.try_recv() {
            if runtime.accept(&ev) {
                activity.on_timer(ev.purpose, runtime);
            } else {
                debug!(?ev, "dropping tick of a replaced timer");
            }
        }

        while let Ok(delivery) = net_rx.try_recv() {
            activity.on_reply(delivery, runtime);
        }
    }

    Ok(())
}

/// Key bindings; which ones apply depends on the visible panel.
pub fn map_key(key: KeyEvent, panel: Panel) -> Option<Input> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('q')) {
        return Some(Input::Quit);
    }
    if ctrl {
        return None;
    }

    let action = match panel {
        Panel::Question => match key.code {
            KeyCode::Char(' ') => Action::ToggleCursor,
            KeyCode::Char(c) if c.is_ascii_lowercase() => Action::Select((c as u8 - b'a') as usize),
            KeyCode::Up => Action::MoveCursor(-1),
            KeyCode::Down => Action::MoveCursor(1),
            KeyCode::Enter => Action::SubmitAnswer,
            _ => return None,
        },
        Panel::Info => match key.code {
            KeyCode::Enter | KeyCode::Char('s') => Action::StartQuiz,
            KeyCode::Char('l') => Action::ShowLeaderboard,
            _ => return None,
        },
        Panel::Leaderboard => match key.code {
            KeyCode::Enter | KeyCode::Char('b') => Action::Back,
            _ => return None,
        },
        Panel::Status => return None,
    };
    Some(Input::Act(action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_pick_answers_on_the_question_panel() {
        assert_eq!(
            map_key(press(KeyCode::Char('c')), Panel::Question),
            Some(Input::Act(Action::Select(2)))
        );
        assert_eq!(map_key(press(KeyCode::Char('c')), Panel::Status), None);
    }

    #[test]
    fn enter_depends_on_panel() {
        assert_eq!(
            map_key(press(KeyCode::Enter), Panel::Question),
            Some(Input::Act(Action::SubmitAnswer))
        );
        assert_eq!(
            map_key(press(KeyCode::Enter), Panel::Info),
            Some(Input::Act(Action::StartQuiz))
        );
        assert_eq!(
            map_key(press(KeyCode::Enter), Panel::Leaderboard),
            Some(Input::Act(Action::Back))
        );
    }

    #[test]
    fn ctrl_q_quits_everywhere() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key, Panel::Question), Some(Input::Quit));
        assert_eq!(map_key(key, Panel::Status), Some(Input::Quit));
    }
}
