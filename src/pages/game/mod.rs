mod effects;

use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, trace};

pub use self::effects::StageEffects;
use super::{Frame, Page, PageId};
use crate::{
    action::{act, Action, ActionState, Command, GameAction},
    components::scene_view::SceneView,
    config::{key_event_to_string, Config, PageKeyBindings},
    constants::TITLE,
    engine::{Audio, TerminalAudio, World},
    game::{EffectDispatcher, GameState, Session},
};

/// Owns the live world and the session playing on it, and swaps both out on restart.
pub struct GamePage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    world: World,
    session: Session,
    audio: Box<dyn Audio>,
    rng: StdRng,
    frames: u64,
    flap_key: Option<String>,
}

impl GamePage {
    /// A fixed `seed` makes the whole run, restarts included, reproducible.
    pub fn new(seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (world, session) = Self::fresh(&mut rng)?;
        Ok(Self {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            world,
            session,
            audio: Box::new(TerminalAudio::default()),
            rng,
            frames: 0,
            flap_key: None,
        })
    }

    pub fn with_audio(self, audio: Box<dyn Audio>) -> Self {
        Self { audio, ..self }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn fresh(rng: &mut StdRng) -> Result<(World, Session)> {
        let world = World::new()?;
        let session = Session::new(&world, StdRng::seed_from_u64(rng.gen()))?;
        Ok((world, session))
    }

    /// Runs one fixed-timestep frame: game rules, then physics, then the contacts it produced.
    pub fn advance_frame(&mut self) -> Result<()> {
        self.session.update(&mut self.world)?;
        for contact in self.world.frame() {
            self.session.on_contact(&mut self.world, contact);
        }
        self.frames += 1;
        self.flush_effects()
    }

    pub fn tap(&mut self) -> Result<()> {
        self.session.tap(&mut self.world);
        if self.world.take_restart_request() {
            let (world, session) = Self::fresh(&mut self.rng)?;
            info!(frames = self.frames, "new session presented");
            self.world = world;
            self.session = session;
            self.frames = 0;
        }
        self.flush_effects()
    }

    fn flush_effects(&mut self) -> Result<()> {
        let effects = self.session.drain_effects();
        if !effects.is_empty() {
            trace!(?effects, "dispatching");
        }
        StageEffects::new(&mut self.world, self.audio.as_mut()).dispatch_all(effects)
    }

    fn status_line(&self) -> Line<'static> {
        let key = self.flap_key.as_deref().unwrap_or("click");
        let hint = match self.session.state() {
            GameState::Active => format!("{key} to flap"),
            GameState::GameOver => format!("game over, {key} to restart"),
            GameState::Wait => String::new(),
        };
        Line::from(vec![
            Span::styled(format!(" Score {} ", self.session.score()), Style::default().bold()),
            Span::raw(" "),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ])
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        self.flap_key = self
            .keymap
            .iter()
            .filter(|(_, action)| action.command == Command::Game(GameAction::Flap))
            .map(|(key, _)| key_event_to_string(key))
            .min();
        Ok(())
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.audio = Box::new(TerminalAudio::new(config.audio.bell));
        Ok(())
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Ok(Some(act!(Command::Game(GameAction::Flap)))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::Tick => self.advance_frame()?,
            Command::Game(GameAction::Flap) if action.state == ActionState::Start => self.tap()?,
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [scene, status] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

        let border = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(TITLE)
            .title_alignment(Alignment::Center);
        let inner = border.inner(scene);
        f.render_widget(border, scene);
        f.render_widget(SceneView::new(self.world.tree()), inner);
        f.render_widget(self.status_line(), status);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::{
        constants::{game::DEATH_ROTATION_DEGREES, scene::*},
        engine::{Physics, SceneGraph, Sound},
    };

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Sound>>>);

    impl Audio for Recorder {
        fn play(&mut self, sound: Sound) {
            self.0.borrow_mut().push(sound);
        }
    }

    fn page() -> (GamePage, Recorder) {
        let recorder = Recorder::default();
        let page = GamePage::new(Some(42)).unwrap().with_audio(Box::new(recorder.clone()));
        (page, recorder)
    }

    fn flap(state: ActionState) -> Action {
        act!(Command::Game(GameAction::Flap), state)
    }

    fn bird(page: &GamePage) -> crate::engine::NodeId {
        page.session().bird().node()
    }

    /// Lets the bird drop onto the ground.
    fn crash(page: &mut GamePage) {
        for _ in 0..120 {
            page.update(act!(Command::Tick)).unwrap();
            if page.session().state() == GameState::GameOver {
                return;
            }
        }
        panic!("bird never hit the ground");
    }

    #[test]
    fn test_ticks_spawn_obstacles() {
        let (mut page, _) = page();
        for _ in 0..90 {
            // Keep the bird in the air.
            if page.world().velocity(bird(&page)).y < -200.0 {
                page.update(flap(ActionState::Start)).unwrap();
            }
            page.update(act!(Command::Tick)).unwrap();
        }
        assert_eq!(page.session().state(), GameState::Active);
        let layer = page.world().find_node(PIPE_LAYER).unwrap();
        assert_eq!(page.world().children(layer).len(), 1);
    }

    #[test]
    fn test_flap_plays_sound_and_lifts() {
        let (mut page, recorder) = page();
        page.update(flap(ActionState::Start)).unwrap();
        assert_eq!(*recorder.0.borrow(), vec![Sound::Flap]);
        assert!(page.world().velocity(bird(&page)).y > 0.0);

        page.update(flap(ActionState::End)).unwrap();
        assert_eq!(recorder.0.borrow().len(), 1);
    }

    #[test]
    fn test_crash_plays_death_effects() {
        let (mut page, _) = page();
        crash(&mut page);
        // Effects are flushed in the frame the contact happened.
        let bird = bird(&page);
        assert_eq!(page.world().rotation(bird), DEATH_ROTATION_DEGREES.to_radians());
        let roots = page.world().root_children();
        assert!(roots.iter().all(|id| !page.world().tree().get(*id).unwrap().actions.is_empty()));

        // The dead bird falls through the ground.
        for _ in 0..60 {
            page.update(act!(Command::Tick)).unwrap();
        }
        let reference = page.world().find_node(BIRD_REFERENCE).unwrap();
        assert!(page.world().convert_to_scene(page.world().position(bird), reference).y < 0.0);
        assert_eq!(page.session().state(), GameState::GameOver);
    }

    #[test]
    fn test_tap_after_game_over_restarts() {
        let (mut page, recorder) = page();
        crash(&mut page);

        page.update(flap(ActionState::Start)).unwrap();

        assert_eq!(page.session().state(), GameState::Active);
        assert_eq!(page.session().score(), 0);
        let bird = bird(&page);
        assert_eq!(page.world().velocity(bird), glam::Vec2::ZERO);
        assert_eq!(page.world().rotation(bird), 0.0);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_left_click_flaps() {
        let (mut page, _) = page();
        let click = |kind| MouseEvent { kind, column: 3, row: 3, modifiers: KeyModifiers::NONE };
        assert_eq!(
            page.handle_mouse_events(click(MouseEventKind::Down(MouseButton::Left))).unwrap(),
            Some(act!(Command::Game(GameAction::Flap)))
        );
        assert_eq!(page.handle_mouse_events(click(MouseEventKind::Moved)).unwrap(), None);
    }

    #[test]
    fn test_draw_shows_score_and_hint() {
        let (mut page, _) = page();
        let config = Config::new().unwrap();
        page.register_keymap(&config.keybindings.pages).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                page.draw(f, area).unwrap();
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let status: String = (0..40).map(|x| buffer[(x, 29)].symbol().to_string()).collect();
        assert!(status.contains("Score 0"), "{status}");
        assert!(status.contains("to flap"), "{status}");
    }
}
