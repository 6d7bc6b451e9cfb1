use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binding::{BindingHandle, ModelSchema};
use crate::menu::{
    label_for, weapon_hand_label, MenuSettings, BOT_SKILL_LABELS, DIFFICULTY_LABELS,
};
use crate::panel::Panel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSlot {
    pub occupied: bool,
    pub selected: bool,
    pub name: String,
    pub ammo: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageEntry {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub time_remaining: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerEntry {
    pub name: String,
    pub score: i32,
    pub deaths: i32,
    pub ping: i32,
    pub team: i32,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSlotEntry {
    pub index: i32,
    pub description: String,
    pub has_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudViewModel {
    pub health: i32,
    pub health_max: i32,
    pub armor: i32,
    pub ammo: i32,
    pub weapon_name: String,
    pub player_name: String,
    pub score: i32,
    pub deaths: i32,
    pub has_weapon: bool,
    pub frag_count: i32,
    pub crosshair: i32,
    pub hud_mode: i32,
    pub weapon_slots: Vec<WeaponSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesViewModel {
    pub messages: Vec<MessageEntry>,
    pub is_typing: bool,
    pub typed_string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardViewModel {
    pub players: Vec<PlayerEntry>,
    pub map_name: String,
    pub game_name: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleViewModel {
    pub log_lines: Vec<String>,
    pub typed_str: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuViewModel {
    pub visible: bool,
    pub show_main: bool,
    pub show_game: bool,
    pub show_botmatch: bool,
    pub show_newgame: bool,
    pub show_options: bool,
    pub show_audiovideo: bool,
    pub show_save: bool,
    pub show_load: bool,
    pub show_quit: bool,
    pub bot_count: i32,
    pub bot_skill: i32,
    pub bot_skill_label: String,
    pub difficulty: i32,
    pub difficulty_label: String,
    pub sensitivity: i32,
    pub fov: i32,
    pub crosshair: i32,
    pub weapon_hand: i32,
    pub weapon_hand_label: String,
    pub invert_mouse: bool,
    pub always_mouselook: bool,
    pub fullscreen: bool,
    pub music_volume: i32,
    pub sound_volume: i32,
    pub brightness: i32,
    pub available_maps: Vec<String>,
    pub map_index: i32,
    pub selected_map: String,
    pub save_slots: Vec<SaveSlotEntry>,
}

impl Default for MenuViewModel {
    fn default() -> Self {
        let mut menu = Self {
            visible: false,
            show_main: true,
            show_game: false,
            show_botmatch: false,
            show_newgame: false,
            show_options: false,
            show_audiovideo: false,
            show_save: false,
            show_load: false,
            show_quit: false,
            bot_count: 0,
            bot_skill: 0,
            bot_skill_label: String::new(),
            difficulty: 0,
            difficulty_label: String::new(),
            sensitivity: 0,
            fov: 0,
            crosshair: 0,
            weapon_hand: 0,
            weapon_hand_label: String::new(),
            invert_mouse: false,
            always_mouselook: false,
            fullscreen: false,
            music_volume: 0,
            sound_volume: 0,
            brightness: 0,
            available_maps: Vec::new(),
            map_index: 0,
            selected_map: String::new(),
            save_slots: Vec::new(),
        };
        menu.load_settings(&MenuSettings::default());
        menu
    }
}

impl MenuViewModel {
    pub fn settings(&self) -> MenuSettings {
        MenuSettings {
            bot_count: self.bot_count,
            bot_skill: self.bot_skill,
            difficulty: self.difficulty,
            sensitivity: self.sensitivity,
            fov: self.fov,
            crosshair: self.crosshair,
            weapon_hand: self.weapon_hand,
            invert_mouse: self.invert_mouse,
            always_mouselook: self.always_mouselook,
            fullscreen: self.fullscreen,
            music_volume: self.music_volume,
            sound_volume: self.sound_volume,
            brightness: self.brightness,
        }
    }

    /// Overwrites the settings fields and their labels without announcing.
    pub fn load_settings(&mut self, settings: &MenuSettings) {
        self.bot_count = settings.bot_count;
        self.bot_skill = settings.bot_skill;
        self.difficulty = settings.difficulty;
        self.sensitivity = settings.sensitivity;
        self.fov = settings.fov;
        self.crosshair = settings.crosshair;
        self.weapon_hand = settings.weapon_hand;
        self.invert_mouse = settings.invert_mouse;
        self.always_mouselook = settings.always_mouselook;
        self.fullscreen = settings.fullscreen;
        self.music_volume = settings.music_volume;
        self.sound_volume = settings.sound_volume;
        self.brightness = settings.brightness;
        self.bot_skill_label = label_for(BOT_SKILL_LABELS, self.bot_skill).to_string();
        self.difficulty_label = label_for(DIFFICULTY_LABELS, self.difficulty).to_string();
        self.weapon_hand_label = weapon_hand_label(self.weapon_hand).to_string();
    }
}

/// Collects the names announced during one synchronizer pass.
pub struct FieldDiff<'a> {
    handle: &'a BindingHandle,
    changed: Vec<&'static str>,
}

impl<'a> FieldDiff<'a> {
    pub fn new(handle: &'a BindingHandle) -> Self {
        Self {
            handle,
            changed: Vec::new(),
        }
    }

    pub fn field<T>(&mut self, name: &'static str, current: &mut T, next: &T)
    where
        T: PartialEq + Clone,
    {
        if current != next {
            current.clone_from(next);
            self.handle.dirty(name);
            self.changed.push(name);
        }
    }

    pub fn into_changed(self) -> Vec<&'static str> {
        self.changed
    }
}

pub trait ViewModel: Serialize + Clone + PartialEq + Default {
    const SCHEMA: ModelSchema;

    /// Commits every differing field of `next`, announcing each through `diff`.
    fn sync_from(&mut self, next: &Self, diff: &mut FieldDiff<'_>);

    /// Document visibility that follows this model's `visible` field, if any.
    fn coupled_visibility(&self) -> Option<bool> {
        None
    }
}

impl ViewModel for HudViewModel {
    const SCHEMA: ModelSchema = ModelSchema {
        panel: Panel::Hud,
        fields: &[
            "health",
            "health_max",
            "armor",
            "ammo",
            "weapon_name",
            "player_name",
            "score",
            "deaths",
            "has_weapon",
            "frag_count",
            "crosshair",
            "hud_mode",
            "weapon_slots",
        ],
        events: &[],
    };

    fn sync_from(&mut self, next: &Self, diff: &mut FieldDiff<'_>) {
        diff.field("health", &mut self.health, &next.health);
        diff.field("health_max", &mut self.health_max, &next.health_max);
        diff.field("armor", &mut self.armor, &next.armor);
        diff.field("ammo", &mut self.ammo, &next.ammo);
        diff.field("weapon_name", &mut self.weapon_name, &next.weapon_name);
        diff.field("player_name", &mut self.player_name, &next.player_name);
        diff.field("score", &mut self.score, &next.score);
        diff.field("deaths", &mut self.deaths, &next.deaths);
        diff.field("has_weapon", &mut self.has_weapon, &next.has_weapon);
        diff.field("frag_count", &mut self.frag_count, &next.frag_count);
        diff.field("crosshair", &mut self.crosshair, &next.crosshair);
        diff.field("hud_mode", &mut self.hud_mode, &next.hud_mode);
        diff.field("weapon_slots", &mut self.weapon_slots, &next.weapon_slots);
    }
}

impl ViewModel for MessagesViewModel {
    const SCHEMA: ModelSchema = ModelSchema {
        panel: Panel::Messages,
        fields: &["messages", "is_typing", "typed_string"],
        events: &[],
    };

    fn sync_from(&mut self, next: &Self, diff: &mut FieldDiff<'_>) {
        diff.field("messages", &mut self.messages, &next.messages);
        diff.field("is_typing", &mut self.is_typing, &next.is_typing);
        diff.field("typed_string", &mut self.typed_string, &next.typed_string);
    }
}

impl ViewModel for ScoreboardViewModel {
    const SCHEMA: ModelSchema = ModelSchema {
        panel: Panel::Scoreboard,
        fields: &["players", "map_name", "game_name", "visible"],
        events: &[],
    };

    fn sync_from(&mut self, next: &Self, diff: &mut FieldDiff<'_>) {
        diff.field("players", &mut self.players, &next.players);
        diff.field("map_name", &mut self.map_name, &next.map_name);
        diff.field("game_name", &mut self.game_name, &next.game_name);
        diff.field("visible", &mut self.visible, &next.visible);
    }

    fn coupled_visibility(&self) -> Option<bool> {
        Some(self.visible)
    }
}

impl ViewModel for ConsoleViewModel {
    const SCHEMA: ModelSchema = ModelSchema {
        panel: Panel::Console,
        fields: &["log_lines", "typed_str", "visible"],
        events: &[],
    };

    fn sync_from(&mut self, next: &Self, diff: &mut FieldDiff<'_>) {
        diff.field("log_lines", &mut self.log_lines, &next.log_lines);
        diff.field("typed_str", &mut self.typed_str, &next.typed_str);
        diff.field("visible", &mut self.visible, &next.visible);
    }

    fn coupled_visibility(&self) -> Option<bool> {
        Some(self.visible)
    }
}

pub const MENU_ACTION_EVENT: &str = "menu_action";

impl ViewModel for MenuViewModel {
    const SCHEMA: ModelSchema = ModelSchema {
        panel: Panel::Menu,
        fields: &[
            "visible",
            "show_main",
            "show_game",
            "show_botmatch",
            "show_newgame",
            "show_options",
            "show_audiovideo",
            "show_save",
            "show_load",
            "show_quit",
            "bot_count",
            "bot_skill",
            "bot_skill_label",
            "difficulty",
            "difficulty_label",
            "sensitivity",
            "fov",
            "crosshair",
            "weapon_hand",
            "weapon_hand_label",
            "invert_mouse",
            "always_mouselook",
            "fullscreen",
            "music_volume",
            "sound_volume",
            "brightness",
            "available_maps",
            "map_index",
            "selected_map",
            "save_slots",
        ],
        events: &[MENU_ACTION_EVENT],
    };

    // Screen flags, map and save-slot lists belong to the navigator. Labels
    // are derived from their values.
    fn sync_from(&mut self, next: &Self, diff: &mut FieldDiff<'_>) {
        diff.field("bot_count", &mut self.bot_count, &next.bot_count);
        diff.field("bot_skill", &mut self.bot_skill, &next.bot_skill);
        diff.field("difficulty", &mut self.difficulty, &next.difficulty);
        diff.field("sensitivity", &mut self.sensitivity, &next.sensitivity);
        diff.field("fov", &mut self.fov, &next.fov);
        diff.field("crosshair", &mut self.crosshair, &next.crosshair);
        diff.field("weapon_hand", &mut self.weapon_hand, &next.weapon_hand);
        diff.field("invert_mouse", &mut self.invert_mouse, &next.invert_mouse);
        diff.field(
            "always_mouselook",
            &mut self.always_mouselook,
            &next.always_mouselook,
        );
        diff.field("fullscreen", &mut self.fullscreen, &next.fullscreen);
        diff.field("music_volume", &mut self.music_volume, &next.music_volume);
        diff.field("sound_volume", &mut self.sound_volume, &next.sound_volume);
        diff.field("brightness", &mut self.brightness, &next.brightness);

        let skill_label = label_for(BOT_SKILL_LABELS, self.bot_skill).to_string();
        diff.field("bot_skill_label", &mut self.bot_skill_label, &skill_label);
        let difficulty_label = label_for(DIFFICULTY_LABELS, self.difficulty).to_string();
        diff.field("difficulty_label", &mut self.difficulty_label, &difficulty_label);
        let hand_label = weapon_hand_label(self.weapon_hand).to_string();
        diff.field("weapon_hand_label", &mut self.weapon_hand_label, &hand_label);
    }
}

/// Snapshot of one panel's data as pushed by the game each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "panel", content = "data", rename_all = "snake_case")]
pub enum ViewModelSnapshot {
    Hud(HudViewModel),
    Messages(MessagesViewModel),
    Scoreboard(ScoreboardViewModel),
    Console(ConsoleViewModel),
    Menu(MenuViewModel),
}

impl ViewModelSnapshot {
    pub fn panel(&self) -> Panel {
        match self {
            ViewModelSnapshot::Hud(_) => Panel::Hud,
            ViewModelSnapshot::Messages(_) => Panel::Messages,
            ViewModelSnapshot::Scoreboard(_) => Panel::Scoreboard,
            ViewModelSnapshot::Console(_) => Panel::Console,
            ViewModelSnapshot::Menu(_) => Panel::Menu,
        }
    }
}

/// Read access to bound values, used by the toolkit when it re-evaluates.
pub trait ModelSource {
    fn field_value(&self, panel: Panel, field: &str) -> Option<Value>;
}

/// The authoritative copy of everything the UI displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModelStore {
    pub hud: HudViewModel,
    pub messages: MessagesViewModel,
    pub scoreboard: ScoreboardViewModel,
    pub console: ConsoleViewModel,
    pub menu: MenuViewModel,
}

impl ViewModelStore {
    pub fn schema(panel: Panel) -> ModelSchema {
        match panel {
            Panel::Hud => HudViewModel::SCHEMA,
            Panel::Messages => MessagesViewModel::SCHEMA,
            Panel::Scoreboard => ScoreboardViewModel::SCHEMA,
            Panel::Console => ConsoleViewModel::SCHEMA,
            Panel::Menu => MenuViewModel::SCHEMA,
        }
    }

    pub fn to_value(&self, panel: Panel) -> Value {
        let value = match panel {
            Panel::Hud => serde_json::to_value(&self.hud),
            Panel::Messages => serde_json::to_value(&self.messages),
            Panel::Scoreboard => serde_json::to_value(&self.scoreboard),
            Panel::Console => serde_json::to_value(&self.console),
            Panel::Menu => serde_json::to_value(&self.menu),
        };
        value.unwrap_or(Value::Null)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl ModelSource for ViewModelStore {
    fn field_value(&self, panel: Panel, field: &str) -> Option<Value> {
        if !Self::schema(panel).has_field(field) {
            return None;
        }
        match self.to_value(panel) {
            Value::Object(mut fields) => fields.remove(field),
            _ => None,
        }
    }
}
