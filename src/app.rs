use crate::cli::FileEngine;
use crate::input::{collect_input, map_event_to_action, Scene, UiAction};
use crate::render::{draw_capybara, draw_center_box, draw_panel, draw_toast, Terminal};
use capygotchi::config::Settings;
use capygotchi::model::{PetEvent, PetPhase, ReconcileOutcome};
use capygotchi::notify::event_text;
use chrono::Utc;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(4);

pub(crate) struct App {
    settings: Settings,
    engine: FileEngine,
    term: Terminal,
    scene: Scene,
    name_edit: String,
    recap: String,
    toast: Option<(String, Instant)>,
    next_reconcile: Instant,
    frame: u64,
    should_quit: bool,
}

impl App {
    fn init(engine: FileEngine, settings: Settings, opened: ReconcileOutcome) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        let interval = Duration::from_secs(settings.reconcile_interval_secs.max(1));
        let mut app = Self {
            settings,
            engine,
            term,
            scene: Scene::Main,
            name_edit: String::new(),
            recap: String::new(),
            toast: None,
            next_reconcile: Instant::now() + interval,
            frame: 0,
            should_quit: false,
        };
        app.show_outcome(&opened);
        app.sync_scene();
        Ok(app)
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_millis(self.settings.refresh_ms.clamp(16, 1000));

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for ev in collect_input(frame_dt)? {
                let name_len = self.name_edit.chars().count();
                if let Some(action) = map_event_to_action(self.scene, name_len, ev) {
                    self.handle(action);
                }
                if self.should_quit {
                    break;
                }
            }

            if Instant::now() >= self.next_reconcile {
                self.reconcile();
            }

            self.render_frame()?;
            self.frame = self.frame.wrapping_add(1);
        }

        self.term.end()?;
        Ok(())
    }

    fn handle(&mut self, action: UiAction) {
        let now = Utc::now();
        match action {
            UiAction::Act(kind) => match self.engine.act(kind, now) {
                Ok(value) => self.toast(format!("{} is now {value}", kind.target())),
                Err(e) => self.toast(e.to_string()),
            },
            UiAction::Reset => match self.engine.reset(now) {
                Ok(()) => {
                    let msg = format!("{} came back home!", self.engine.state().name);
                    self.toast(msg);
                }
                Err(e) => self.toast(e.to_string()),
            },
            UiAction::HelpToggle => {
                self.scene = if self.scene == Scene::Help {
                    Scene::Main
                } else {
                    Scene::Help
                };
            }
            UiAction::RenameOpen => {
                self.name_edit = self.engine.state().name.clone();
                self.scene = Scene::Rename;
            }
            UiAction::RenameChar(ch) => self.name_edit.push(ch),
            UiAction::RenameBackspace => {
                self.name_edit.pop();
            }
            UiAction::RenameCommit => {
                let edit = std::mem::take(&mut self.name_edit);
                self.engine.rename(&edit, now);
                self.scene = Scene::Main;
            }
            UiAction::Back => self.scene = Scene::Main,
            UiAction::Quit => self.should_quit = true,
            UiAction::Refocus => self.reconcile(),
        }
        self.sync_scene();
    }

    fn reconcile(&mut self) {
        let outcome = self.engine.reconcile(Utc::now());
        let interval = Duration::from_secs(self.settings.reconcile_interval_secs.max(1));
        self.next_reconcile = Instant::now() + interval;
        self.show_outcome(&outcome);
        self.sync_scene();
    }

    fn show_outcome(&mut self, outcome: &ReconcileOutcome) {
        if outcome.hours_applied == 0 {
            return;
        }
        let st = self.engine.state();
        let mut body = format!(
            "{} hour(s) went by.\n\nFood       {}\nDrink      {}\nHappiness  {}\n",
            outcome.hours_applied, st.food, st.drink, st.happiness
        );
        for event in &outcome.events {
            if *event == PetEvent::RanAway {
                continue;
            }
            let (_, line) = event_text(&st.name, event);
            body.push('\n');
            body.push_str(&line);
        }
        body.push_str("\n\nPress any key");
        self.recap = body;
        self.scene = Scene::Recap;
    }

    /// The runaway screen wins over everything but help.
    fn sync_scene(&mut self) {
        match (self.engine.phase(), self.scene) {
            (PetPhase::RanAway, Scene::Main | Scene::Recap | Scene::Rename) => {
                self.scene = Scene::RanAway
            }
            (PetPhase::Active, Scene::RanAway) => self.scene = Scene::Main,
            _ => {}
        }
    }

    fn toast(&mut self, msg: String) {
        self.toast = Some((msg, Instant::now() + TOAST_TTL));
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        let buf = &mut self.term.cur;
        buf.clear();

        let st = self.engine.state();
        draw_panel(buf, st, self.settings.enable_color);

        if st.phase() == PetPhase::Active {
            let cols = self.term.cols;
            let panel_w = 26.min(cols);
            let cx = panel_w + (cols - panel_w) / 2;
            let cy = self.term.rows / 2;
            // bob once a second or so
            let bob = (self.frame / 4) % 2 == 1;
            draw_capybara(buf, st, cx, cy, bob);
        }

        match self.scene {
            Scene::Main => {}
            Scene::Recap => draw_center_box(buf, "While you were away...", &self.recap),
            Scene::Help => draw_center_box(
                buf,
                "How to play",
                "Keep food, drink and happiness up.\n\
                 Each stat drops one point per hour,\n\
                 even while the game is closed.\n\n\
                 F Feed (costs coins)   W Water (costs coins)\n\
                 P Pet (free)           N Rename\n\n\
                 If all three reach zero, your capybara runs away.\n\n\
                 Esc or H to close help.",
            ),
            Scene::Rename => {
                let mut preview = self.name_edit.clone();
                preview.push('_');
                draw_center_box(
                    buf,
                    "Rename",
                    &format!("Name: {preview}\n\nEnter save | Esc cancel | Backspace delete"),
                );
            }
            Scene::RanAway => {
                let title = format!("{} ran away.", st.name);
                draw_center_box(
                    buf,
                    &title,
                    "Food, drink and happiness all reached zero.\n\n\
                     Press R to welcome a new capybara, or Q to quit.",
                );
            }
        }

        if matches!(&self.toast, Some((_, until)) if Instant::now() >= *until) {
            self.toast = None;
        }
        if let Some((msg, _)) = &self.toast {
            draw_toast(buf, msg);
        }

        self.term.present()?;
        Ok(())
    }
}

pub(crate) fn run(engine: FileEngine, settings: Settings, opened: ReconcileOutcome) -> anyhow::Result<()> {
    let mut app = App::init(engine, settings, opened)?;
    let res = app.run();
    if res.is_err() {
        let _ = app.term.end();
    }
    res
}
