use serde::{Deserialize, Serialize};

use crate::viewmodel::MenuViewModel;

/// The adjustable values the menu hands to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    pub bot_count: i32,
    pub bot_skill: i32,
    pub difficulty: i32,
    pub sensitivity: i32,
    pub fov: i32,
    pub crosshair: i32,
    /// -1 left, 0 center, 1 right.
    pub weapon_hand: i32,
    pub invert_mouse: bool,
    pub always_mouselook: bool,
    pub fullscreen: bool,
    pub music_volume: i32,
    pub sound_volume: i32,
    pub brightness: i32,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            bot_count: 4,
            bot_skill: 1,
            difficulty: 1,
            sensitivity: 3,
            fov: 90,
            crosshair: 0,
            weapon_hand: 1,
            invert_mouse: false,
            always_mouselook: true,
            fullscreen: false,
            music_volume: 160,
            sound_volume: 200,
            brightness: 5,
        }
    }
}

pub const BOT_SKILL_LABELS: &[&str] = &[
    "Novice",
    "Average",
    "Experienced",
    "Skilled",
    "Adept",
    "Masterful",
    "Inhuman",
    "Godlike",
];

pub const DIFFICULTY_LABELS: &[&str] = &["Easy", "Medium", "Hard", "Unreal"];

pub fn label_for(labels: &[&'static str], value: i32) -> &'static str {
    usize::try_from(value)
        .ok()
        .and_then(|index| labels.get(index))
        .copied()
        .unwrap_or("")
}

pub fn bot_skill_label(value: i32) -> &'static str {
    label_for(BOT_SKILL_LABELS, value)
}

pub fn difficulty_label(value: i32) -> &'static str {
    label_for(DIFFICULTY_LABELS, value)
}

pub fn weapon_hand_label(hand: i32) -> &'static str {
    match hand {
        -1 => "Left",
        0 => "Center",
        1 => "Right",
        _ => "",
    }
}

/// left -> center -> right -> left
pub fn next_weapon_hand(hand: i32) -> i32 {
    match hand {
        -1 => 0,
        0 => 1,
        _ => -1,
    }
}

macro_rules! menu_field {
    ($field:ident: $ty:ty) => {{
        fn access(menu: &mut MenuViewModel) -> &mut $ty {
            &mut menu.$field
        }
        access
    }};
}

pub(crate) use menu_field;

/// Derived text field recomputed after its numeric field moves.
#[derive(Clone, Copy)]
pub struct LabelBinding {
    pub binding: &'static str,
    pub field: fn(&mut MenuViewModel) -> &mut String,
    pub text: fn(i32) -> &'static str,
}

/// One clamp-and-announce setting driven by an up/down action pair.
#[derive(Clone, Copy)]
pub struct Adjustment {
    pub increase: &'static str,
    pub decrease: &'static str,
    pub binding: &'static str,
    pub step: i32,
    pub min: i32,
    pub max: i32,
    pub field: fn(&mut MenuViewModel) -> &mut i32,
    pub label: Option<LabelBinding>,
    /// Pushed to the game right away instead of on resume.
    pub applies_immediately: bool,
}

pub const ADJUSTMENTS: &[Adjustment] = &[
    Adjustment {
        increase: "bots_up",
        decrease: "bots_down",
        binding: "bot_count",
        step: 1,
        min: 1,
        max: 15,
        field: menu_field!(bot_count: i32),
        label: None,
        applies_immediately: false,
    },
    Adjustment {
        increase: "skill_up",
        decrease: "skill_down",
        binding: "bot_skill",
        step: 1,
        min: 0,
        max: 7,
        field: menu_field!(bot_skill: i32),
        label: Some(LabelBinding {
            binding: "bot_skill_label",
            field: menu_field!(bot_skill_label: String),
            text: bot_skill_label,
        }),
        applies_immediately: false,
    },
    Adjustment {
        increase: "difficulty_up",
        decrease: "difficulty_down",
        binding: "difficulty",
        step: 1,
        min: 0,
        max: 3,
        field: menu_field!(difficulty: i32),
        label: Some(LabelBinding {
            binding: "difficulty_label",
            field: menu_field!(difficulty_label: String),
            text: difficulty_label,
        }),
        applies_immediately: false,
    },
    Adjustment {
        increase: "sens_up",
        decrease: "sens_down",
        binding: "sensitivity",
        step: 1,
        min: 1,
        max: 20,
        field: menu_field!(sensitivity: i32),
        label: None,
        applies_immediately: false,
    },
    Adjustment {
        increase: "fov_up",
        decrease: "fov_down",
        binding: "fov",
        step: 5,
        min: 80,
        max: 130,
        field: menu_field!(fov: i32),
        label: None,
        applies_immediately: false,
    },
    Adjustment {
        increase: "crosshair_next",
        decrease: "crosshair_prev",
        binding: "crosshair",
        step: 1,
        min: 0,
        max: 5,
        field: menu_field!(crosshair: i32),
        label: None,
        applies_immediately: false,
    },
    Adjustment {
        increase: "music_up",
        decrease: "music_down",
        binding: "music_volume",
        step: 16,
        min: 0,
        max: 255,
        field: menu_field!(music_volume: i32),
        label: None,
        applies_immediately: true,
    },
    Adjustment {
        increase: "sound_up",
        decrease: "sound_down",
        binding: "sound_volume",
        step: 16,
        min: 0,
        max: 255,
        field: menu_field!(sound_volume: i32),
        label: None,
        applies_immediately: true,
    },
    Adjustment {
        increase: "bright_up",
        decrease: "bright_down",
        binding: "brightness",
        step: 1,
        min: 1,
        max: 10,
        field: menu_field!(brightness: i32),
        label: None,
        applies_immediately: true,
    },
];

/// Returns the matching adjustment and the signed delta for `action`.
pub fn find_adjustment(action: &str) -> Option<(&'static Adjustment, i32)> {
    ADJUSTMENTS.iter().find_map(|adjustment| {
        if adjustment.increase == action {
            Some((adjustment, adjustment.step))
        } else if adjustment.decrease == action {
            Some((adjustment, -adjustment.step))
        } else {
            None
        }
    })
}

#[derive(Clone, Copy)]
pub struct Toggle {
    pub action: &'static str,
    pub binding: &'static str,
    pub field: fn(&mut MenuViewModel) -> &mut bool,
}

pub const TOGGLES: &[Toggle] = &[
    Toggle {
        action: "toggle_invert",
        binding: "invert_mouse",
        field: menu_field!(invert_mouse: bool),
    },
    Toggle {
        action: "toggle_mouselook",
        binding: "always_mouselook",
        field: menu_field!(always_mouselook: bool),
    },
    Toggle {
        action: "toggle_fullscreen",
        binding: "fullscreen",
        field: menu_field!(fullscreen: bool),
    },
];

pub fn find_toggle(action: &str) -> Option<&'static Toggle> {
    TOGGLES.iter().find(|toggle| toggle.action == action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ModelSchema;
    use crate::viewmodel::ViewModel;

    fn schema() -> ModelSchema {
        MenuViewModel::SCHEMA
    }

    #[test]
    fn tables_bind_real_schema_fields() {
        for adjustment in ADJUSTMENTS {
            assert!(schema().has_field(adjustment.binding), "{}", adjustment.binding);
            if let Some(label) = adjustment.label {
                assert!(schema().has_field(label.binding), "{}", label.binding);
            }
        }
        for toggle in TOGGLES {
            assert!(schema().has_field(toggle.binding), "{}", toggle.binding);
        }
    }

    #[test]
    fn defaults_sit_inside_their_ranges() {
        let mut menu = MenuViewModel::default();
        for adjustment in ADJUSTMENTS {
            let value = *(adjustment.field)(&mut menu);
            assert!(
                (adjustment.min..=adjustment.max).contains(&value),
                "{} = {value}",
                adjustment.binding
            );
        }
    }

    #[test]
    fn actions_resolve_to_signed_steps() {
        let (adjustment, delta) = find_adjustment("fov_down").expect("fov_down");
        assert_eq!(adjustment.binding, "fov");
        assert_eq!(delta, -5);
        assert_eq!(find_adjustment("music_up").map(|(_, delta)| delta), Some(16));
        assert!(find_adjustment("fov").is_none());
        assert_eq!(
            find_toggle("toggle_fullscreen").map(|toggle| toggle.binding),
            Some("fullscreen")
        );
    }

    #[test]
    fn labels_cover_their_ranges() {
        assert_eq!(bot_skill_label(0), "Novice");
        assert_eq!(bot_skill_label(7), "Godlike");
        assert_eq!(bot_skill_label(8), "");
        assert_eq!(difficulty_label(3), "Unreal");
        assert_eq!(difficulty_label(-1), "");
    }

    #[test]
    fn weapon_hand_cycles_through_three_sides() {
        let mut hand = -1;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(weapon_hand_label(hand));
            hand = next_weapon_hand(hand);
        }
        assert_eq!(seen, vec!["Left", "Center", "Right", "Left"]);
    }
}
