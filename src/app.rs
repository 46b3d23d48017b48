use color_eyre::eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::{act, Action, Command},
    components::help::Help,
    config::Config,
    constants::{MIN_HEIGHT, MIN_WIDTH},
    pages::{game::GamePage, Page},
    tui,
};

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    pages: Vec<Box<dyn Page>>,
    active_page_index: usize,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64, seed: Option<u64>) -> Result<Self> {
        let config = Config::new()?;
        let game_page = GamePage::new(seed)?;

        Ok(Self {
            tick_rate,
            frame_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            config,
            pages: vec![Box::new(game_page)],
            active_page_index: 0,
        })
    }

    fn active_page(&mut self) -> Option<&mut Box<dyn Page>> {
        self.pages.get_mut(self.active_page_index)
    }

    fn new_tui(&self) -> Result<tui::Tui> {
        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.mouse(true);
        tui.enter()?;
        Ok(tui)
    }

    /// Maps a key press to its bound action. Global bindings win over page bindings.
    fn lookup_key(&mut self, key: crossterm::event::KeyEvent) -> Option<Action> {
        let page_id = self.active_page()?.id();
        self.config
            .keybindings
            .global
            .get(&key)
            .or_else(|| self.config.keybindings.pages.get(&page_id).and_then(|keymap| keymap.get(&key)))
            .cloned()
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = self.new_tui()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings.pages)?;
            page.register_action_handler(action_tx.clone())?;
            page.register_config_handler(self.config.clone())?;
            page.init()?;
        }

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Quit => action_tx.send(act!(Command::Quit))?,
                    tui::Event::Tick => action_tx.send(act!(Command::Tick))?,
                    tui::Event::Render => action_tx.send(act!(Command::Render))?,
                    tui::Event::Resize(x, y) => action_tx.send(act!(Command::Resize(x, y)))?,
                    tui::Event::Key(key) => {
                        if let Some(action) = self.lookup_key(key) {
                            log::info!("Got action: {action:?}");
                            action_tx.send(action)?;
                        }
                    },
                    _ => {},
                }
                if !self.show_help {
                    if let Some(page) = self.active_page() {
                        if let Some(action) = page.handle_events(Some(e))? {
                            action_tx.send(action)?;
                        }
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                let command = &action.command;
                if *command != Command::Tick && *command != Command::Render {
                    log::debug!("{command:?}");
                }
                match command {
                    Command::Quit => self.should_quit = true,
                    Command::Suspend => self.should_suspend = true,
                    Command::Resume => self.should_suspend = false,
                    Command::ToggleShowHelp => self.show_help = !self.show_help,
                    Command::Error(message) => log::error!("{message}"),
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::Render => self.render(&mut tui, &action_tx)?,
                    _ => {},
                }
                // The game is paused while the help overlay is up.
                if !self.show_help {
                    if let Some(page) = self.active_page() {
                        if let Some(action) = page.update(action)? {
                            action_tx.send(action)?
                        }
                    }
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui = self.new_tui()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            let area = f.area();
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                draw_resize_message(f, area);
                return;
            }

            if let Some(page) = self.pages.get_mut(self.active_page_index) {
                if let Err(e) = page.draw(f, area) {
                    let _ = action_tx.send(act!(Command::Error(format!("Failed to draw: {e:?}"))));
                }
            }

            if self.show_help {
                self.draw_help(f, area);
            }
        })?;

        Ok(())
    }

    fn draw_help(&self, f: &mut Frame<'_>, area: Rect) {
        let mut groups = vec![("System".to_string(), self.config.keybindings.global.clone())];
        if let Some(page) = self.pages.get(self.active_page_index) {
            let id = page.id();
            if let Some(keymap) = self.config.keybindings.pages.get(&id) {
                groups.push((id.to_string(), keymap.clone()));
            }
        }
        f.render_widget(Help::new(groups), area);
    }
}

fn draw_resize_message(f: &mut Frame<'_>, area: Rect) {
    let [area] = Layout::vertical([Constraint::Length(area.height.min(5))]).areas(area);
    let message = Paragraph::new(format!("Please resize the terminal to at least {MIN_WIDTH}x{MIN_HEIGHT}"))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(message, area);
}
