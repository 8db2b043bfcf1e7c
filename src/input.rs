use capygotchi::model::{ActionKind, NAME_MAX};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    Help,
    Rename,
    Recap,
    RanAway,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum UiAction {
    Act(ActionKind),
    Reset,
    HelpToggle,
    RenameOpen,
    RenameChar(char),
    RenameBackspace,
    RenameCommit,
    Back,
    Quit,
    /// Terminal regained focus; catch up on decay.
    Refocus,
}

#[derive(Clone, Debug)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    FocusGained,
}

/// Waits up to `max_wait` for the first event, then drains whatever else is
/// queued.
pub(crate) fn collect_input(max_wait: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();
    let mut timeout = max_wait;
    while event::poll(timeout)? {
        timeout = Duration::ZERO;
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                out.push(InputEvent::Key {
                    key: k.code,
                    mods: k.modifiers,
                });
            }
            Event::FocusGained => out.push(InputEvent::FocusGained),
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(scene: Scene, name_len: usize, ev: InputEvent) -> Option<UiAction> {
    let (key, mods) = match ev {
        InputEvent::FocusGained => return Some(UiAction::Refocus),
        InputEvent::Key { key, mods } => (key, mods),
    };

    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(UiAction::Quit);
    }

    if scene == Scene::Rename {
        return match key {
            KeyCode::Enter => Some(UiAction::RenameCommit),
            KeyCode::Esc => Some(UiAction::Back),
            KeyCode::Backspace => Some(UiAction::RenameBackspace),
            KeyCode::Char(ch) if (ch.is_ascii_graphic() || ch == ' ') && name_len < NAME_MAX => {
                Some(UiAction::RenameChar(ch))
            }
            _ => None,
        };
    }

    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(UiAction::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') => return Some(UiAction::HelpToggle),
        KeyCode::Esc => return Some(UiAction::Back),
        _ => {}
    }

    match scene {
        Scene::Main => match key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(UiAction::Act(ActionKind::Feed)),
            KeyCode::Char('w') | KeyCode::Char('W') => Some(UiAction::Act(ActionKind::Water)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(UiAction::Act(ActionKind::Pet)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(UiAction::RenameOpen),
            _ => None,
        },
        Scene::RanAway => match key {
            KeyCode::Char('r') | KeyCode::Char('R') => Some(UiAction::Reset),
            _ => None,
        },
        // any key dismisses the recap
        Scene::Recap => Some(UiAction::Back),
        Scene::Help | Scene::Rename => None,
    }
}
