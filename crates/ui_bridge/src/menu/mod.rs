//! Menu screen navigation.
//!
//! The navigator is a short-lived view over the menu view model, its binding
//! handle, the game bridge and the documents. It is rebuilt for every action
//! so nothing here outlives a frame.

mod maps;
mod save_slots;
mod screens;
mod settings;

pub use maps::{deathmatch_maps, is_deathmatch_map, NO_MAPS_PLACEHOLDER};
pub use save_slots::{is_valid_slot, save_slot_path, scan_save_slots, SAVE_SLOT_COUNT};
pub use screens::{MenuScreen, ScreenEntry, SCREENS};
pub use settings::{
    bot_skill_label, difficulty_label, find_adjustment, find_toggle, label_for, next_weapon_hand,
    weapon_hand_label, Adjustment, LabelBinding, MenuSettings, Toggle, ADJUSTMENTS,
    BOT_SKILL_LABELS, DIFFICULTY_LABELS, TOGGLES,
};

use tracing::{info, warn};

use crate::binding::BindingHandle;
use crate::bridge::{GameBridge, TravelType, DEFAULT_SAVE_EXTENSION};
use crate::documents::DocumentControl;
use crate::panel::Panel;
use crate::viewmodel::{FieldDiff, MenuViewModel, ViewModel};

pub struct MenuNavigator<'a> {
    menu: &'a mut MenuViewModel,
    handle: &'a BindingHandle,
    bridge: Option<&'a mut dyn GameBridge>,
    documents: &'a mut dyn DocumentControl,
}

impl<'a> MenuNavigator<'a> {
    pub fn new(
        menu: &'a mut MenuViewModel,
        handle: &'a BindingHandle,
        bridge: Option<&'a mut dyn GameBridge>,
        documents: &'a mut dyn DocumentControl,
    ) -> Self {
        Self {
            menu,
            handle,
            bridge,
            documents,
        }
    }

    pub fn current_screen(&self) -> MenuScreen {
        MenuScreen::active(self.menu)
    }

    /// Makes `screen` the only active screen, announcing flags that flipped.
    pub fn set_screen(&mut self, screen: MenuScreen) {
        for entry in SCREENS {
            let flag = (entry.flag)(self.menu);
            let active = entry.screen == screen;
            if *flag != active {
                *flag = active;
                self.handle.dirty(entry.binding);
            }
        }
    }

    /// Enters `screen`, populating the lists it displays first.
    pub fn navigate(&mut self, screen: MenuScreen) {
        match screen {
            MenuScreen::Botmatch => self.populate_available_maps(),
            MenuScreen::Save | MenuScreen::Load => self.populate_save_slots(),
            _ => {}
        }
        self.set_screen(screen);
    }

    /// Dispatches one action. Returns `false` for actions that did nothing.
    pub fn handle_action(&mut self, action: &str) -> bool {
        if !self.handle.is_live() {
            return false;
        }

        match action {
            "resume" => self.resume(),
            "open_menu" => self.open(),
            "toggle_menu" => self.toggle(),
            "back" => self.back(),
            "quit_yes" => {
                info!("menu_quit_requested");
                if let Some(bridge) = self.bridge.as_deref_mut() {
                    bridge.quit();
                }
            }
            "hand_cycle" => self.cycle_weapon_hand(),
            "map_next" => return self.cycle_map(1),
            "map_prev" => return self.cycle_map(-1),
            "start_botmatch" => return self.start_botmatch(),
            "start_newgame" => return self.start_newgame(),
            _ => return self.handle_parameterized(action),
        }
        true
    }

    fn handle_parameterized(&mut self, action: &str) -> bool {
        if let Some(screen) = MenuScreen::from_name(action) {
            self.navigate(screen);
            return true;
        }
        if let Some((adjustment, delta)) = find_adjustment(action) {
            self.adjust(adjustment, delta);
            return true;
        }
        if let Some(toggle) = find_toggle(action) {
            let field = (toggle.field)(self.menu);
            *field = !*field;
            self.handle.dirty(toggle.binding);
            return true;
        }
        if let Some(suffix) = action.strip_prefix("save_") {
            return match parse_slot(suffix) {
                Some(slot) => {
                    self.save_to_slot(slot);
                    true
                }
                None => {
                    warn!(action, "menu_slot_invalid");
                    false
                }
            };
        }
        if let Some(suffix) = action.strip_prefix("load_") {
            return match parse_slot(suffix) {
                Some(slot) => {
                    self.load_from_slot(slot);
                    true
                }
                None => {
                    warn!(action, "menu_slot_invalid");
                    false
                }
            };
        }

        warn!(action, "menu_action_unknown");
        false
    }

    pub fn open(&mut self) {
        self.documents.show(Panel::Menu);
        self.set_visible(true);
        if let Some(bridge) = self.bridge.as_deref_mut() {
            bridge.set_pause(true);
            bridge.set_menu_input_suppression(true);
            if let Some(settings) = bridge.current_settings() {
                let mut next = self.menu.clone();
                next.load_settings(&settings);
                let mut diff = FieldDiff::new(self.handle);
                self.menu.sync_from(&next, &mut diff);
            }
        }
        self.set_screen(MenuScreen::Main);
    }

    pub fn resume(&mut self) {
        self.documents.hide(Panel::Menu);
        self.set_visible(false);
        let settings = self.menu.settings();
        if let Some(bridge) = self.bridge.as_deref_mut() {
            bridge.set_pause(false);
            bridge.set_menu_input_suppression(false);
            bridge.apply_settings(&settings);
        }
        self.set_screen(MenuScreen::Main);
    }

    pub fn toggle(&mut self) {
        if self.menu.visible || self.documents.is_visible(Panel::Menu) {
            self.resume();
        } else {
            self.open();
        }
    }

    fn back(&mut self) {
        let current = self.current_screen();
        if current != MenuScreen::Main {
            self.navigate(current.parent());
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.menu.visible = visible;
        self.handle.dirty("visible");
    }

    /// Clamp-and-announce. Announces even when the clamp left the value alone.
    fn adjust(&mut self, adjustment: &Adjustment, delta: i32) {
        let field = (adjustment.field)(self.menu);
        *field = field
            .saturating_add(delta)
            .clamp(adjustment.min, adjustment.max);
        let value = *field;
        self.handle.dirty(adjustment.binding);

        if let Some(label) = adjustment.label {
            *(label.field)(self.menu) = (label.text)(value).to_string();
            self.handle.dirty(label.binding);
        }

        if adjustment.applies_immediately {
            let settings = self.menu.settings();
            if let Some(bridge) = self.bridge.as_deref_mut() {
                bridge.apply_settings(&settings);
            }
        }
    }

    fn cycle_weapon_hand(&mut self) {
        self.menu.weapon_hand = next_weapon_hand(self.menu.weapon_hand);
        self.menu.weapon_hand_label = weapon_hand_label(self.menu.weapon_hand).to_string();
        self.handle.dirty("weapon_hand");
        self.handle.dirty("weapon_hand_label");
    }

    fn cycle_map(&mut self, step: i32) -> bool {
        let count = self.menu.available_maps.len() as i32;
        if count == 0 {
            return false;
        }
        let index = (self.menu.map_index.rem_euclid(count) + step).rem_euclid(count);
        self.menu.map_index = index;
        self.menu.selected_map = self.menu.available_maps[index as usize].clone();
        self.handle.dirty("map_index");
        self.handle.dirty("selected_map");
        true
    }

    /// Memoized: once a non-empty list is cached it is never rebuilt.
    pub fn populate_available_maps(&mut self) {
        if !self.menu.available_maps.is_empty() {
            return;
        }
        let names = self
            .bridge
            .as_deref()
            .map(|bridge| bridge.map_names())
            .unwrap_or_default();
        let maps = deathmatch_maps(&names);
        info!(count = maps.len(), "menu_maps_populated");

        self.menu.map_index = 0;
        self.menu.selected_map = maps
            .first()
            .cloned()
            .unwrap_or_else(|| NO_MAPS_PLACEHOLDER.to_string());
        self.menu.available_maps = maps;
        self.handle.dirty("available_maps");
        self.handle.dirty("map_index");
        self.handle.dirty("selected_map");
    }

    pub fn populate_save_slots(&mut self) {
        let (root, extension) = match self.bridge.as_deref() {
            Some(bridge) => (bridge.game_root(), bridge.save_extension()),
            None => (None, DEFAULT_SAVE_EXTENSION.to_string()),
        };
        self.menu.save_slots = scan_save_slots(root.as_deref(), &extension);
        self.handle.dirty("save_slots");
    }

    fn start_botmatch(&mut self) -> bool {
        if self.menu.available_maps.is_empty() {
            warn!("menu_botmatch_without_maps");
            return false;
        }
        let url = format!(
            "{}?NumBots={}?BotSkill={}",
            self.menu.selected_map, self.menu.bot_count, self.menu.bot_skill
        );
        self.travel_and_resume(&url)
    }

    fn start_newgame(&mut self) -> bool {
        let Some(start_map) = self
            .bridge
            .as_deref()
            .and_then(|bridge| bridge.start_map())
            .filter(|map| !map.is_empty())
        else {
            warn!("menu_newgame_without_start_map");
            return false;
        };
        let url = format!("{start_map}?Difficulty={}", self.menu.difficulty);
        self.travel_and_resume(&url)
    }

    fn travel_and_resume(&mut self, url: &str) -> bool {
        let Some(bridge) = self.bridge.as_deref_mut() else {
            return false;
        };
        info!(url, "menu_travel");
        bridge.start_travel(url, TravelType::Absolute);
        self.resume();
        true
    }

    fn save_to_slot(&mut self, slot: i32) {
        if let Some(bridge) = self.bridge.as_deref_mut() {
            bridge.set_save_slot(slot, &format!("Save {slot}"));
        }
        self.navigate(MenuScreen::Game);
    }

    fn load_from_slot(&mut self, slot: i32) {
        if let Some(bridge) = self.bridge.as_deref_mut() {
            match bridge.active_map().filter(|map| !map.is_empty()) {
                Some(map) => {
                    let url = format!("{map}?load={slot}");
                    info!(url = %url, "menu_travel");
                    bridge.start_travel(&url, TravelType::Absolute);
                }
                None => warn!(slot, "menu_load_without_active_map"),
            }
        }
        self.resume();
    }
}

fn parse_slot(suffix: &str) -> Option<i32> {
    suffix.parse::<i32>().ok().filter(|slot| is_valid_slot(*slot))
}
