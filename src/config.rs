use std::{collections::HashMap, fmt::Debug, path::PathBuf};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
    de::{self, Deserializer},
    Deserialize,
};

use crate::{
    action::{Action, ActionState, Command, GameAction},
    pages::PageId,
};

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AudioConfig {
    /// Ring the terminal bell for sound effects.
    #[serde(default)]
    pub bell: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub audio: AudioConfig,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let default_config: Config =
            serde_yaml::from_str(CONFIG).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.display().to_string())?
            .set_default("_config_dir", config_dir.display().to_string())?
            .set_default("audio.bell", default_config.audio.bell)?;

        let config_files = [("config.yaml", config::FileFormat::Yaml)];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file found in {}, using defaults", config_dir.display());
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        for (scope, default_bindings) in default_config.keybindings.pages.iter() {
            let user_bindings = cfg.keybindings.pages.entry(scope.clone()).or_default();
            for (key, cmd) in default_bindings.iter() {
                user_bindings.entry(*key).or_insert_with(|| cmd.clone());
            }
        }
        let user_bindings = &mut cfg.keybindings.global;
        for (key, cmd) in default_config.keybindings.global.iter() {
            user_bindings.entry(*key).or_insert_with(|| cmd.clone());
        }

        Ok(cfg)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct _RawPageKeyBindings {
    pub click: Option<HashMap<String, String>>,
    pub hold: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct _RawKeyBindings {
    #[serde(default)]
    pub global: _RawPageKeyBindings,
    #[serde(default)]
    pub pages: HashMap<String, _RawPageKeyBindings>,
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct PageKeyBindings(pub HashMap<KeyEvent, Action>);

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: PageKeyBindings,
    pub pages: HashMap<PageId, PageKeyBindings>,
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_keybindings: _RawKeyBindings = _RawKeyBindings::deserialize(deserializer)?;

        let global_keybindings = PageKeyBindings(
            parse_global_keybindings(&raw_keybindings.global)
                .map_err(de::Error::custom)?
                .into_iter()
                .map(|(event, (command, state))| (event, Action { command, state }))
                .collect(),
        );
        let page_keybindings = raw_keybindings
            .pages
            .iter()
            .map(|(page, keybindings)| match_page_keybindings(page, keybindings))
            .collect::<Result<HashMap<_, _>, String>>()
            .map_err(de::Error::custom)?;

        Ok(KeyBindings { global: global_keybindings, pages: page_keybindings })
    }
}

macro_rules! parse_and_map_actions {
    ( $( ( $page_id_variant:path, $action_type:ty, $action_variant:path ) ),* ) => {
        fn match_page_keybindings(
            page: &str,
            raw_page_keybindings: &_RawPageKeyBindings,
        ) -> Result<(PageId, PageKeyBindings), String> {
            let page_id: PageId = serde_yaml::from_str(page).map_err(|e| format!("Unknown page `{page}`: {e}"))?;
            let map = match page_id {
                $(
                    $page_id_variant => {
                        parse_page_keybindings::<$action_type>(raw_page_keybindings)?
                            .into_iter()
                            .map(|(event, (command, state))| (event, Action { command: $action_variant(command), state }))
                            .collect()
                    },
                )*
            };

            Ok((page_id, PageKeyBindings(map)))
        }
    };
}

parse_and_map_actions![(PageId::Game, GameAction, Command::Game)];

fn parse_binding_pairs<T>(map: &Option<HashMap<String, String>>) -> Result<HashMap<KeyEvent, T>, String>
where
    T: for<'a> Deserialize<'a>,
{
    let Some(inner_map) = map else {
        return Ok(HashMap::new());
    };
    inner_map
        .iter()
        .map(|(key_str, action_str)| -> Result<(KeyEvent, T), String> {
            let action: T =
                serde_yaml::from_str(action_str).map_err(|e| format!("Unknown command `{action_str}`: {e}"))?;
            Ok((parse_key_event(key_str)?, action))
        })
        .collect()
}

fn parse_global_keybindings(
    raw_keybindings: &_RawPageKeyBindings,
) -> Result<HashMap<KeyEvent, (Command, ActionState)>, String> {
    let click_keybindings = parse_binding_pairs::<Command>(&raw_keybindings.click)?;
    let hold_keybindings = parse_binding_pairs::<Command>(&raw_keybindings.hold)?;

    Ok(merge_keybinding_maps(click_keybindings, hold_keybindings))
}

fn parse_page_keybindings<T>(
    raw_page_keybindings: &_RawPageKeyBindings,
) -> Result<HashMap<KeyEvent, (T, ActionState)>, String>
where
    T: for<'a> Deserialize<'a> + Clone + Debug,
{
    let click_keybindings = parse_binding_pairs::<T>(&raw_page_keybindings.click)?;
    let hold_keybindings = parse_binding_pairs::<T>(&raw_page_keybindings.hold)?;

    Ok(merge_keybinding_maps(click_keybindings, hold_keybindings))
}

fn merge_keybinding_maps<A: Clone>(
    click: HashMap<KeyEvent, A>,
    hold: HashMap<KeyEvent, A>,
) -> HashMap<KeyEvent, (A, ActionState)> {
    let mut click: HashMap<KeyEvent, (A, ActionState)> =
        click.into_iter().map(|(event, command)| (event, (command, ActionState::default()))).collect();
    for (mut key_event, action) in hold {
        click.insert(key_event, (action.clone(), ActionState::Start));
        key_event.kind = KeyEventKind::Release;
        click.insert(key_event, (action.clone(), ActionState::End));
        key_event.kind = KeyEventKind::Repeat;
        click.insert(key_event, (action.clone(), ActionState::Repeat));
    }

    click
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let raw = if !raw.contains("><") {
        let raw = raw.strip_prefix('<').unwrap_or(raw);
        let raw = raw.strip_prefix('>').unwrap_or(raw);
        raw
    } else {
        raw
    };
    let raw = raw.trim_start_matches('<').trim_end_matches('>');

    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        },
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n @ 1..=12) => KeyCode::F(n),
            _ => return Err(format!("Unable to parse {raw}")),
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().unwrap_or_default();
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

/// Formats a key event in the same syntax the config file uses.
pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(c) => {
            char = format!("f{c}");
            &char
        },
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        },
        KeyCode::Esc => "esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);

    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("ctrl");
    }

    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("alt");
    }

    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("shift");
    }

    let mut key = modifiers.join("-");

    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);

    key
}
