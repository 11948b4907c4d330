use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::game::components::AppPhase;
use crate::game::match_state::{HudSnapshot, MatchStatus};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppPhase::InMatch), setup_hud);
        app.add_systems(
            Update,
            (update_bars, update_timer_text, update_overlay).run_if(in_state(AppPhase::InMatch)),
        );
    }
}

#[derive(Clone, Copy)]
enum Bar {
    Stamina,
    Ammo,
    Boss,
}

/// Filled part of a bar.
#[derive(Component)]
struct BarFill(Bar);

/// Whole bar, hidden when it has nothing to show.
#[derive(Component)]
struct BarFrame(Bar);

#[derive(Component)]
struct BarLabel(Bar);

#[derive(Component)]
struct TimerText;

#[derive(Component)]
struct Overlay;

#[derive(Component)]
enum OverlayText {
    Title,
    Subtitle,
}

const BAR_WIDTH: f32 = 150.0;
const BAR_HEIGHT: f32 = 30.0;

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        TimerText,
        Text::new("Time: 0.00s"),
        TextFont { font_size: 30.0, ..default() },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
    ));

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            top: Val::Px(50.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(20.0),
            ..default()
        })
        .with_children(|parent| {
            spawn_bar(parent, Bar::Stamina, Color::srgb_u8(175, 95, 0), Color::srgb_u8(255, 151, 0));
            spawn_bar(parent, Bar::Ammo, Color::srgb_u8(25, 135, 140), Color::srgb_u8(70, 230, 240));
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            right: Val::Px(250.0),
            top: Val::Px(35.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("BOSS"),
                TextFont { font_size: 16.0, ..default() },
                TextColor(Color::WHITE),
            ));
            spawn_bar(parent, Bar::Boss, Color::srgb_u8(60, 10, 100), Color::srgb_u8(150, 60, 230));
        });

    commands
        .spawn((
            Overlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(40.0),
                position_type: PositionType::Absolute,
                display: Display::None,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(10),
        ))
        .with_children(|parent| {
            parent.spawn((
                OverlayText::Title,
                Text::new(""),
                TextFont { font_size: 150.0, ..default() },
                TextColor(Color::srgb_u8(255, 151, 0)),
            ));
            parent.spawn((
                OverlayText::Subtitle,
                Text::new(""),
                TextFont { font_size: 50.0, ..default() },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Press R to Restart or Q to Quit"),
                TextFont { font_size: 50.0, ..default() },
                TextColor(Color::WHITE),
            ));
        });
}

fn spawn_bar(parent: &mut ChildSpawnerCommands, bar: Bar, bg: Color, fg: Color) {
    parent
        .spawn((
            BarFrame(bar),
            Node {
                width: Val::Px(BAR_WIDTH),
                height: Val::Px(BAR_HEIGHT),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(bg),
        ))
        .with_children(|frame| {
            frame.spawn((
                BarFill(bar),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(0.0),
                    top: Val::Px(0.0),
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(fg),
            ));
            frame.spawn((
                BarLabel(bar),
                Text::new(""),
                TextFont { font_size: 20.0, ..default() },
                TextColor(Color::srgb(1.0, 0.0, 0.0)),
            ));
        });
}

/// `(fraction, label)` for a bar, or `None` when the bar has nothing to show.
fn bar_value(hud: &HudSnapshot, bar: Bar) -> Option<(f32, String)> {
    let ratio = |cur: f32, max: f32| if max > 0.0 { (cur / max).clamp(0.0, 1.0) } else { 0.0 };
    match bar {
        Bar::Stamina => Some((ratio(hud.stamina, hud.max_stamina), "STAMINA".into())),
        Bar::Ammo => Some((ratio(hud.ammo, hud.max_ammo), "AMMO".into())),
        Bar::Boss => hud
            .boss_health
            .map(|(hp, max)| (ratio(hp as f32, max as f32), format!("{hp}/{max}"))),
    }
}

fn update_bars(
    hud: Res<HudSnapshot>,
    mut fills: Query<(&BarFill, &mut Node), Without<BarFrame>>,
    mut frames: Query<(&BarFrame, &mut Node), Without<BarFill>>,
    mut labels: Query<(&BarLabel, &mut Text)>,
) {
    for (fill, mut node) in &mut fills {
        let fraction = bar_value(&hud, fill.0).map_or(0.0, |(f, _)| f);
        node.width = Val::Percent(fraction * 100.0);
    }
    for (frame, mut node) in &mut frames {
        node.display = if bar_value(&hud, frame.0).is_some() {
            Display::Flex
        } else {
            Display::None
        };
    }
    for (label, mut text) in &mut labels {
        if let Some((_, value)) = bar_value(&hud, label.0) {
            **text = value;
        }
    }
}

fn update_timer_text(hud: Res<HudSnapshot>, mut texts: Query<&mut Text, With<TimerText>>) {
    for mut text in &mut texts {
        **text = format!("Time: {:.2}s", hud.elapsed);
    }
}

fn update_overlay(
    hud: Res<HudSnapshot>,
    mut overlays: Query<&mut Node, With<Overlay>>,
    mut texts: Query<(&OverlayText, &mut Text)>,
) {
    let title = match hud.status {
        MatchStatus::BossDefeated => "You Win!",
        MatchStatus::PlayerDead => "Game Over!",
        MatchStatus::Idle | MatchStatus::Running => {
            for mut node in &mut overlays {
                node.display = Display::None;
            }
            return;
        }
    };
    for mut node in &mut overlays {
        node.display = Display::Flex;
    }
    for (kind, mut text) in &mut texts {
        **text = match kind {
            OverlayText::Title => title.to_string(),
            OverlayText::Subtitle => format!("Time: {:.2} seconds", hud.elapsed),
        };
    }
}
