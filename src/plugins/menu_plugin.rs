use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::game::components::AppPhase;
use crate::game::events::MatchCommand;

// ── Nickname entry ───────────────────────────────────────────────────

/// Nickname typed on the main menu.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct NicknameField {
    pub value: String,
}

impl NicknameField {
    pub const MAX_CHARS: usize = 15;

    /// Append printable characters until the length cap is reached.
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            if self.value.chars().count() >= Self::MAX_CHARS {
                break;
            }
            self.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    /// The nickname to start with, if one has been typed.
    pub fn submit(&self) -> Option<String> {
        (!self.value.is_empty()).then(|| self.value.clone())
    }
}

// ── Marker components ────────────────────────────────────────────────

#[derive(Component)]
struct MainMenuRoot;

#[derive(Component)]
struct NicknameDisplay;

#[derive(Component)]
enum MenuButton {
    StartGame,
    Quit,
}

// ── Colors ───────────────────────────────────────────────────────────

const COLOR_BG: Color = Color::srgb(0.41, 0.46, 0.56);
const COLOR_BTN: Color = Color::WHITE;
const COLOR_BTN_HOVER: Color = Color::srgb(0.85, 0.85, 0.85);
const COLOR_BTN_PRESS: Color = Color::srgb(0.7, 0.7, 0.7);
const COLOR_INPUT_BG: Color = Color::WHITE;
const COLOR_TEXT: Color = Color::BLACK;

// ── Plugin ───────────────────────────────────────────────────────────

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NicknameField>();

        app.add_systems(OnEnter(AppPhase::MainMenu), spawn_main_menu);
        app.add_systems(OnExit(AppPhase::MainMenu), despawn::<MainMenuRoot>);
        app.add_systems(
            Update,
            (nickname_input_system, menu_button_system, update_nickname_display)
                .chain()
                .run_if(in_state(AppPhase::MainMenu)),
        );
    }
}

// ── Generic despawn ──────────────────────────────────────────────────

fn despawn<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MAIN MENU
// ═══════════════════════════════════════════════════════════════════════

fn spawn_main_menu(mut commands: Commands) {
    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(COLOR_BG),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Enter Nickname:"),
                TextFont { font_size: 35.0, ..default() },
                TextColor(COLOR_TEXT),
            ));
            parent
                .spawn((
                    Node {
                        width: Val::Px(300.0),
                        height: Val::Px(50.0),
                        align_items: AlignItems::Center,
                        padding: UiRect::horizontal(Val::Px(10.0)),
                        margin: UiRect::bottom(Val::Px(60.0)),
                        ..default()
                    },
                    BackgroundColor(COLOR_INPUT_BG),
                ))
                .with_children(|input| {
                    input.spawn((
                        NicknameDisplay,
                        Text::new(""),
                        TextFont { font_size: 35.0, ..default() },
                        TextColor(COLOR_TEXT),
                    ));
                });
            spawn_btn(parent, "Start Game", MenuButton::StartGame);
            spawn_btn(parent, "Quit", MenuButton::Quit);
        });
}

fn nickname_input_system(
    mut field: ResMut<NicknameField>,
    mut keyboard_events: MessageReader<KeyboardInput>,
    mut requests: MessageWriter<MatchCommand>,
    mut next_state: ResMut<NextState<AppPhase>>,
) {
    for event in keyboard_events.read() {
        if !event.state.is_pressed() {
            continue;
        }
        match &event.logical_key {
            Key::Backspace => field.backspace(),
            Key::Enter => {
                if let Some(nickname) = field.submit() {
                    start_match(nickname, &mut requests, &mut next_state);
                    return;
                }
            }
            Key::Character(c) => field.push_str(c.as_str()),
            Key::Space => field.push_str(" "),
            _ => {}
        }
    }
}

fn menu_button_system(
    mut q: Query<(&Interaction, &MenuButton, &mut BackgroundColor), Changed<Interaction>>,
    field: Res<NicknameField>,
    mut requests: MessageWriter<MatchCommand>,
    mut next_state: ResMut<NextState<AppPhase>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, button, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(COLOR_BTN_PRESS);
                match button {
                    MenuButton::StartGame => {
                        if let Some(nickname) = field.submit() {
                            start_match(nickname, &mut requests, &mut next_state);
                        }
                    }
                    MenuButton::Quit => {
                        exit.write(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => *bg = BackgroundColor(COLOR_BTN_HOVER),
            Interaction::None => *bg = BackgroundColor(COLOR_BTN),
        }
    }
}

fn start_match(
    nickname: String,
    requests: &mut MessageWriter<MatchCommand>,
    next_state: &mut NextState<AppPhase>,
) {
    info!("Starting match as {nickname}");
    requests.write(MatchCommand::Start { nickname });
    next_state.set(AppPhase::InMatch);
}

fn update_nickname_display(
    field: Res<NicknameField>,
    mut displays: Query<&mut Text, With<NicknameDisplay>>,
) {
    if !field.is_changed() {
        return;
    }
    for mut text in &mut displays {
        **text = field.value.clone();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn spawn_btn<C: Component>(parent: &mut ChildSpawnerCommands, label: &str, marker: C) {
    parent
        .spawn((
            marker,
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border_radius: BorderRadius::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(COLOR_BTN),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont { font_size: 30.0, ..default() },
                TextColor(COLOR_TEXT),
            ));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_caps_at_fifteen_chars() {
        let mut field = NicknameField::default();
        field.push_str("abcdefghij");
        field.push_str("klmnopqrst");
        assert_eq!(field.value, "abcdefghijklmno");
    }

    #[test]
    fn backspace_and_submit() {
        let mut field = NicknameField::default();
        assert_eq!(field.submit(), None);
        field.push_str("ab\u{8}");
        assert_eq!(field.value, "ab");
        field.backspace();
        assert_eq!(field.submit(), Some("a".to_string()));
        field.backspace();
        field.backspace();
        assert_eq!(field.submit(), None);
    }
}
