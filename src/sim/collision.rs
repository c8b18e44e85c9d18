//! Collision and avoidance resolution
//!
//! Obstacles collide when they share the player's lane and their row spans
//! overlap, unless the player's current action avoids that height class.

use serde::{Deserialize, Serialize};

use super::motion::{Action, HeightClass, Item, Obstacle, Player};
use super::projection::Viewport;
use crate::consts::*;

/// Inclusive ranges `a` and `b` share at least one row
#[inline]
pub fn spans_overlap(a: (i32, i32), b: (i32, i32)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Whether an action gets past an obstacle of the given height class
pub fn avoids(action: Action, height: HeightClass) -> bool {
    match (height, action) {
        (HeightClass::Low, Action::Jumping { .. }) => true,
        (HeightClass::High, Action::Sliding { .. }) => true,
        (HeightClass::Low, Action::Normal | Action::Sliding { .. }) => false,
        (HeightClass::High, Action::Normal | Action::Jumping { .. }) => false,
        (HeightClass::Full, _) => false,
    }
}

/// Index of the first obstacle the player collides with this tick
pub fn resolve(player: &Player, obstacles: &[Obstacle], vp: &Viewport) -> Option<usize> {
    let player_span = player.span(vp);
    obstacles.iter().position(|obstacle| {
        obstacle.lane == player.lane
            && spans_overlap(obstacle.span(), player_span)
            && !avoids(player.action, obstacle.height)
    })
}

/// Indices of all items close enough to pick up, in list order
pub fn resolve_items(player: &Player, items: &[Item], vp: &Viewport) -> Vec<usize> {
    let row = vp.player_row();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.lane == player.lane && (item.depth - row).abs() <= ITEM_PICKUP_RANGE
        })
        .map(|(i, _)| i)
        .collect()
}

/// What a confirmed collision did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    /// Still invincible from an earlier hit
    Ignored,
    /// Shield consumed instead of health
    Absorbed,
    /// Health lost; `fatal` when none is left
    Damaged { fatal: bool },
}

/// Apply a confirmed obstacle collision to the player
///
/// The caller removes the obstacle when the shield absorbed it.
pub fn apply_impact(player: &mut Player) -> Impact {
    if player.is_invincible() {
        Impact::Ignored
    } else if player.shield {
        player.shield = false;
        Impact::Absorbed
    } else {
        Impact::Damaged {
            fatal: player.take_hit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::motion::ItemKind;

    fn obstacle_near_player(vp: &Viewport, height: HeightClass) -> Obstacle {
        Obstacle {
            lane: 1,
            depth: vp.player_row() - 2,
            height,
        }
    }

    #[test]
    fn test_low_obstacle_hits_standing_player() {
        let vp = Viewport::default();
        let player = Player::new();
        let obstacles = [obstacle_near_player(&vp, HeightClass::Low)];
        assert_eq!(resolve(&player, &obstacles, &vp), Some(0));
    }

    #[test]
    fn test_jump_clears_low_obstacle() {
        let vp = Viewport::default();
        let mut player = Player::new();
        player.jump();
        let obstacles = [obstacle_near_player(&vp, HeightClass::Low)];
        assert_eq!(resolve(&player, &obstacles, &vp), None);
    }

    #[test]
    fn test_slide_clears_high_obstacle() {
        let vp = Viewport::default();
        let mut player = Player::new();
        let obstacles = [obstacle_near_player(&vp, HeightClass::High)];
        assert_eq!(resolve(&player, &obstacles, &vp), Some(0));
        player.slide();
        assert_eq!(resolve(&player, &obstacles, &vp), None);
        player.action = Action::Jumping { timer: 3 };
        assert_eq!(resolve(&player, &obstacles, &vp), Some(0));
    }

    #[test]
    fn test_full_obstacle_ignores_action() {
        let vp = Viewport::default();
        let obstacles = [obstacle_near_player(&vp, HeightClass::Full)];
        for action in [
            Action::Normal,
            Action::Jumping { timer: 6 },
            Action::Sliding { timer: 6 },
        ] {
            let player = Player {
                action,
                ..Player::new()
            };
            assert_eq!(resolve(&player, &obstacles, &vp), Some(0));
        }

        let mut other_lane = Player::new();
        other_lane.move_to_lane(0);
        assert_eq!(resolve(&other_lane, &obstacles, &vp), None);
    }

    #[test]
    fn test_no_overlap_no_collision() {
        let vp = Viewport::default();
        let player = Player::new();
        let (top, bottom) = player.span(&vp);
        let above = Obstacle {
            lane: 1,
            depth: top - OBSTACLE_HEIGHT,
            height: HeightClass::Full,
        };
        let below = Obstacle {
            lane: 1,
            depth: bottom + 1,
            height: HeightClass::Full,
        };
        assert_eq!(resolve(&player, &[above, below], &vp), None);
    }

    #[test]
    fn test_first_collision_wins() {
        let vp = Viewport::default();
        let player = Player::new();
        let obstacles = [
            Obstacle {
                lane: 0,
                ..obstacle_near_player(&vp, HeightClass::Low)
            },
            obstacle_near_player(&vp, HeightClass::High),
            obstacle_near_player(&vp, HeightClass::Low),
        ];
        assert_eq!(resolve(&player, &obstacles, &vp), Some(1));
    }

    #[test]
    fn test_item_pickup_range() {
        let vp = Viewport::default();
        let player = Player::new();
        let row = vp.player_row();
        let items = [
            Item {
                lane: 1,
                depth: row - ITEM_PICKUP_RANGE,
                kind: ItemKind::Consumable,
            },
            Item {
                lane: 1,
                depth: row - ITEM_PICKUP_RANGE - 1,
                kind: ItemKind::Shield,
            },
            Item {
                lane: 2,
                depth: row,
                kind: ItemKind::Shield,
            },
            Item {
                lane: 1,
                depth: row + ITEM_PICKUP_RANGE,
                kind: ItemKind::Shield,
            },
        ];
        assert_eq!(resolve_items(&player, &items, &vp), vec![0, 3]);
    }

    #[test]
    fn test_shield_absorbs_once() {
        let mut player = Player::new();
        player.shield = true;
        assert_eq!(apply_impact(&mut player), Impact::Absorbed);
        assert!(!player.shield);
        assert_eq!(player.health, MAX_HEALTH);
        assert_eq!(
            apply_impact(&mut player),
            Impact::Damaged { fatal: false }
        );
        assert_eq!(player.health, MAX_HEALTH - 1);
    }

    #[test]
    fn test_invincible_player_ignores_impact() {
        let mut player = Player::new();
        player.shield = true;
        player.invincibility = 2;
        assert_eq!(apply_impact(&mut player), Impact::Ignored);
        assert!(player.shield);
        assert_eq!(player.health, MAX_HEALTH);
    }

    #[test]
    fn test_last_health_is_fatal() {
        let mut player = Player {
            health: 1,
            ..Player::new()
        };
        assert_eq!(apply_impact(&mut player), Impact::Damaged { fatal: true });
    }

    #[test]
    fn test_spans_overlap() {
        assert!(spans_overlap((0, 2), (2, 4)));
        assert!(spans_overlap((3, 3), (0, 9)));
        assert!(!spans_overlap((0, 2), (3, 5)));
    }
}
