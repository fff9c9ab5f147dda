//! Nav bar, header viewport, and widget cards.

use bevy::picking::Pickable;
use bevy::prelude::*;
use pinboard_bevy::components::{HeaderContent, HeaderViewport, widget_bundle};
use pinboard_bevy::events::{
    LayoutCommand, LayoutWasReset, PositionCommitted, WidgetDataCleared, WidgetDragStarted,
};
use pinboard_bevy::resources::HeaderLayout;
use pinboard_core::WidgetDescriptor;

use super::{sketchpad, theme};
use crate::config::AppConfig;
use crate::widgets;

/// Marker for the "Reset layout" button; only shown when positions differ
/// from their defaults.
#[derive(Component)]
pub struct ResetLayoutButton;

/// Marker for the game tile's click button.
#[derive(Component)]
pub struct GameButton;

/// Marker for the game tile's score label.
#[derive(Component)]
pub struct GameScoreLabel;

/// Click count for the game tile, persisted as widget data.
#[derive(Resource, Default)]
pub struct GameScore(pub u32);

const GAME_SCORE_KEY: &str = "score";

pub fn load_game_score(layout: Option<Res<HeaderLayout>>, mut score: ResMut<GameScore>) {
    if let Some(layout) = layout {
        score.0 = layout
            .persistence()
            .read_widget_data(widgets::GAME, GAME_SCORE_KEY, 0);
    }
}

/// Spawn the camera, nav bar, and header with every widget.
pub fn spawn_header(
    mut commands: Commands,
    layout: Option<Res<HeaderLayout>>,
    config: Res<AppConfig>,
    score: Res<GameScore>,
) {
    commands.spawn(Camera2d);

    let Some(layout) = layout else {
        tracing::warn!("No widget layout; header left empty");
        return;
    };

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            ..default()
        })
        .with_children(|root| {
            spawn_nav_bar(root, layout.has_changes());

            root.spawn((
                HeaderViewport,
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(config.header_height),
                    overflow: Overflow::scroll_x(),
                    ..default()
                },
                ScrollPosition::default(),
                BackgroundColor(theme::BG_HEADER),
            ))
            .with_children(|viewport| {
                viewport
                    .spawn((
                        HeaderContent,
                        Node {
                            position_type: PositionType::Relative,
                            width: Val::Px(config.content_width),
                            min_width: Val::Px(config.content_width),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                    ))
                    .with_children(|content| {
                        for descriptor in layout.descriptors() {
                            spawn_widget_card(content, descriptor, &layout, &score);
                        }
                    });
            });
        });
}

fn spawn_nav_bar(parent: &mut ChildSpawnerCommands, has_changes: bool) {
    parent
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(theme::NAV_HEIGHT),
                padding: UiRect::axes(Val::Px(16.0), Val::Px(0.0)),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(theme::BG_CARD),
        ))
        .with_children(|nav| {
            nav.spawn((
                Text::new("pinboard"),
                TextFont {
                    font_size: theme::FONT_SIZE_BODY,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
            ));
            nav.spawn((
                ResetLayoutButton,
                Button,
                Node {
                    display: reset_display(has_changes),
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                    ..default()
                },
                BackgroundColor(theme::BG_BUTTON),
            ))
            .with_children(|button| {
                button.spawn((
                    Text::new("Reset layout"),
                    TextFont {
                        font_size: theme::FONT_SIZE_TITLE,
                        ..default()
                    },
                    TextColor(theme::TEXT_ON_BUTTON),
                ));
            });
        });
}

fn spawn_widget_card(
    parent: &mut ChildSpawnerCommands,
    descriptor: &WidgetDescriptor,
    layout: &HeaderLayout,
    score: &GameScore,
) {
    parent
        .spawn((
            widget_bundle(descriptor, layout),
            BackgroundColor(theme::BG_CARD),
        ))
        .with_children(|card| {
            card.spawn((
                Node {
                    height: Val::Px(theme::TITLE_HEIGHT),
                    padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                    ..default()
                },
                Pickable::IGNORE,
            ))
            .with_children(|title| {
                title.spawn((
                    Text::new(descriptor.id.clone()),
                    TextFont {
                        font_size: theme::FONT_SIZE_TITLE,
                        ..default()
                    },
                    TextColor(theme::TEXT_DIM),
                    Pickable::IGNORE,
                ));
            });

            match descriptor.id.as_str() {
                widgets::SKETCHPAD => sketchpad::spawn_sketchpad(card),
                widgets::GAME => spawn_game(card, score),
                _ => spawn_text_body(card, descriptor.content.as_deref().unwrap_or_default()),
            }
        });
}

fn spawn_text_body(parent: &mut ChildSpawnerCommands, body: &str) {
    parent.spawn((
        Node {
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        Text::new(body),
        TextFont {
            font_size: theme::FONT_SIZE_BODY,
            ..default()
        },
        TextColor(theme::TEXT_PRIMARY),
        Pickable::IGNORE,
    ));
}

fn spawn_game(parent: &mut ChildSpawnerCommands, score: &GameScore) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: Val::Px(8.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        })
        .with_children(|body| {
            body.spawn((
                GameScoreLabel,
                Text::new(score_text(score.0)),
                TextFont {
                    font_size: theme::FONT_SIZE_BODY,
                    ..default()
                },
                TextColor(theme::TEXT_PRIMARY),
                Pickable::IGNORE,
            ));
            body.spawn((
                GameButton,
                Button,
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(theme::BG_BUTTON),
            ))
            .with_children(|button| {
                button.spawn((
                    Text::new("Click!"),
                    TextFont {
                        font_size: theme::FONT_SIZE_TITLE,
                        ..default()
                    },
                    TextColor(theme::TEXT_ON_BUTTON),
                ));
            });
        });
}

fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

fn reset_display(has_changes: bool) -> Display {
    if has_changes {
        Display::Flex
    } else {
        Display::None
    }
}

// ── Systems ─────────────────────────────────────────────────────────────────

pub fn handle_reset_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<ResetLayoutButton>)>,
    mut commands: MessageWriter<LayoutCommand>,
) {
    for interaction in interactions.iter() {
        if *interaction == Interaction::Pressed {
            commands.write(LayoutCommand::Reset);
        }
    }
}

/// Show the reset button only while some widget is off its default.
pub fn sync_reset_button(
    layout: Option<Res<HeaderLayout>>,
    mut q_button: Query<&mut Node, With<ResetLayoutButton>>,
) {
    let Some(layout) = layout else {
        return;
    };
    if !layout.is_changed() {
        return;
    }
    let display = reset_display(layout.has_changes());
    for mut node in q_button.iter_mut() {
        if node.display != display {
            node.display = display;
        }
    }
}

pub fn handle_game_button(
    interactions: Query<&Interaction, (Changed<Interaction>, With<GameButton>)>,
    mut q_label: Query<&mut Text, With<GameScoreLabel>>,
    layout: Option<Res<HeaderLayout>>,
    mut score: ResMut<GameScore>,
) {
    for interaction in interactions.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        score.0 += 1;
        if let Some(layout) = layout.as_ref() {
            layout
                .persistence()
                .write_widget_data(widgets::GAME, GAME_SCORE_KEY, &score.0);
        }
        for mut text in q_label.iter_mut() {
            text.0 = score_text(score.0);
        }
    }
}

pub fn log_layout_messages(
    mut started: MessageReader<WidgetDragStarted>,
    mut committed: MessageReader<PositionCommitted>,
    mut was_reset: MessageReader<LayoutWasReset>,
    mut cleared: MessageReader<WidgetDataCleared>,
) {
    for msg in started.read() {
        tracing::debug!("Picked up {}", msg.widget_id);
    }
    for msg in committed.read() {
        tracing::info!(
            "Moved {} to ({:.0}, {:.0})",
            msg.widget_id,
            msg.position.x,
            msg.position.y
        );
    }
    for _ in was_reset.read() {
        tracing::info!("Layout reset");
    }
    for msg in cleared.read() {
        tracing::info!("Cleared {} entries for {}", msg.removed, msg.widget_id);
    }
}
