//! Two-speed simulation clock
//!
//! A scheduler wakes the clock at a fixed interval. Every wake-up runs the
//! animation phase ([`SimulationClock::animate`]); every `LOGIC_DIVISOR`-th
//! wake-up also runs one logic tick ([`SimulationClock::step`]).
//!
//! Logic tick order:
//! 1. pause toggle, then the player's command (or the autopilot's)
//! 2. player timers, distance, score-driven speed
//! 3. track update (a missed turn is penalized here)
//! 4. spawns, in the random draw order documented in [`super::random`]
//! 5. scrolling, pursuer, off-screen cleanup
//! 6. obstacle collision, item pickups, achievements

use rand_pcg::Pcg32;

use super::collision::{Impact, apply_impact, avoids, resolve, resolve_items};
use super::motion::{
    Action, HeightClass, Item, ItemKind, Obstacle, Scenery, advance_all, sweep,
};
use super::projection::Viewport;
use super::random::{RandomSource, seeded};
use super::road::{Direction, TurnResult};
use super::state::{GameEvent, RunPhase, RunState, Snapshot};
use crate::achievements::{AchievementStore, evaluate};
use crate::consts::*;
use crate::tuning::Tuning;

/// Classified player input for one logic tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    #[default]
    None,
    LaneLeft,
    LaneRight,
    Jump,
    Slide,
    TurnLeft,
    TurnRight,
}

/// Input for a single logic tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub command: Command,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Owns a run and advances it
#[derive(Debug, Clone)]
pub struct SimulationClock<R = Pcg32> {
    pub state: RunState,
    rng: R,
    tuning: Tuning,
}

impl SimulationClock<Pcg32> {
    /// New run driven by the default seeded generator
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_source(seed, seeded(seed), tuning)
    }
}

impl<R: RandomSource> SimulationClock<R> {
    /// New run with an explicit random source
    pub fn with_source(seed: u64, rng: R, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            state: RunState::new(seed, &tuning),
            rng,
            tuning,
        }
    }

    /// Resume a run from restored parts
    pub fn from_parts(state: RunState, rng: R, tuning: Tuning) -> Self {
        Self {
            state,
            rng,
            tuning: tuning.sanitized(),
        }
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    /// Start a fresh run; the random stream carries on
    pub fn reset(&mut self) {
        self.state = RunState::new(self.state.seed, &self.tuning);
        log::info!("Run reset");
    }

    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            RunPhase::Playing => RunPhase::Paused,
            RunPhase::Paused => RunPhase::Playing,
            RunPhase::GameOver => RunPhase::GameOver,
        };
    }

    /// One scheduler wake-up: animation always, logic when it is due
    ///
    /// Returns `None` when no logic ran; the host should keep its input for
    /// the next wake-up.
    pub fn wake(
        &mut self,
        input: &TickInput,
        vp: Viewport,
        store: &mut dyn AchievementStore,
    ) -> Option<Vec<GameEvent>> {
        self.animate();
        if self.state.cadence.wake() {
            Some(self.step(input, vp, store))
        } else {
            None
        }
    }

    /// Animation phase: pose smoothing, breathing and pursuer frames
    pub fn animate(&mut self) {
        if self.state.phase == RunPhase::Paused {
            return;
        }
        let target = self.state.player.vertical_offset();
        self.state.pose.animate(target);
        self.state.pursuer.animate();
    }

    /// Logic phase: advance the run by one tick
    pub fn step(
        &mut self,
        input: &TickInput,
        vp: Viewport,
        store: &mut dyn AchievementStore,
    ) -> Vec<GameEvent> {
        if input.pause {
            self.toggle_pause();
        }
        if self.state.phase != RunPhase::Playing {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.logic(input, vp, &mut events);

        for achievement in evaluate(&self.state, &events, store) {
            events.push(GameEvent::AchievementUnlocked(achievement));
        }
        events
    }

    fn logic(&mut self, input: &TickInput, vp: Viewport, events: &mut Vec<GameEvent>) {
        let state = &mut self.state;
        state.viewport = vp;
        state.logic_ticks = state.logic_ticks.wrapping_add(1);

        let command = if input.idle_mode {
            autopilot(state, &vp)
        } else {
            input.command
        };
        apply_command(state, command, events);
        if state.phase == RunPhase::GameOver {
            return;
        }

        state.player.update();
        state.score.advance(state.speed);
        state.speed = self.tuning.speed_for_score(state.score.total());

        if state
            .road
            .update(state.speed, state.score.distance, &mut self.rng)
        {
            events.push(GameEvent::TurnFail { missed: true });
            state.penalize(events);
            if state.phase == RunPhase::GameOver {
                return;
            }
        }

        spawn(state, &self.tuning, &mut self.rng);

        let speed = state.speed;
        advance_all(&mut state.obstacles, speed);
        advance_all(&mut state.items, speed);
        advance_all(&mut state.scenery, speed);

        if state.pursuer_awakened {
            state.pursuer.update(vp.player_row(), speed);
            state.ticks_since_awakened = state.ticks_since_awakened.saturating_add(1);
        }
        state.pursuer_visible_ticks = state.pursuer_visible_ticks.saturating_sub(1);

        let bound = vp.depth_bound();
        for _ in 0..sweep(&mut state.obstacles, bound) {
            state.score.obstacle_cleared();
        }
        sweep(&mut state.items, bound);
        sweep(&mut state.scenery, bound);

        if let Some(index) = resolve(&state.player, &state.obstacles, &vp) {
            match apply_impact(&mut state.player) {
                Impact::Ignored => {}
                Impact::Absorbed => {
                    state.obstacles.remove(index);
                    events.push(GameEvent::Hit { shielded: true });
                    log::info!("Shield absorbed a hit");
                }
                Impact::Damaged { fatal } => {
                    state.record_hit(fatal, events);
                    if fatal {
                        return;
                    }
                }
            }
        }

        let picked = resolve_items(&state.player, &state.items, &vp);
        let mut collected = Vec::with_capacity(picked.len());
        for index in picked.into_iter().rev() {
            collected.push(state.items.remove(index).kind);
        }
        for kind in collected.into_iter().rev() {
            match kind {
                ItemKind::Consumable => state.score.add_bonus(SCORE_PER_ITEM),
                ItemKind::Shield => state.player.shield = true,
            }
            events.push(GameEvent::ItemCollected(kind));
        }
    }
}

/// Carry out one command; turn commands are judged against the track
fn apply_command(state: &mut RunState, command: Command, events: &mut Vec<GameEvent>) {
    let turn = match command {
        Command::None => return,
        Command::LaneLeft => {
            state.player.shift_lane(Direction::Left);
            return;
        }
        Command::LaneRight => {
            state.player.shift_lane(Direction::Right);
            return;
        }
        Command::Jump => {
            state.player.jump();
            return;
        }
        Command::Slide => {
            state.player.slide();
            return;
        }
        Command::TurnLeft => -1,
        Command::TurnRight => 1,
    };

    match state.road.check_turn(turn) {
        TurnResult::None => {}
        TurnResult::Success => {
            state.score.add_bonus(SCORE_PER_TURN);
            events.push(GameEvent::TurnSuccess);
        }
        TurnResult::WrongDirection => {
            events.push(GameEvent::TurnFail { missed: false });
            state.penalize(events);
        }
    }
}

/// Roll for new obstacles, items and scenery
fn spawn(state: &mut RunState, tuning: &Tuning, rng: &mut impl RandomSource) {
    let lanes = u32::from(LANES);

    let rate = tuning.obstacle_spawn_rate;
    if rate > 0 && (rng.roll(rate) as i32) < state.speed {
        let lane = rng.roll(lanes) as u8;
        let kind = rng.roll(HeightClass::SPAWNED.len() as u32) as usize;
        let height = HeightClass::SPAWNED[kind.min(HeightClass::SPAWNED.len() - 1)];
        log::debug!("Spawn {:?} obstacle in lane {}", height, lane);
        state.obstacles.push(Obstacle::new(lane, height));
    }

    if rng.roll(100) < tuning.item_spawn_percent {
        let lane = rng.roll(lanes) as u8;
        let kind = if rng.roll(100) < tuning.shield_percent {
            ItemKind::Shield
        } else {
            ItemKind::Consumable
        };
        log::debug!("Spawn {:?} item in lane {}", kind, lane);
        state.items.push(Item::new(lane, kind));
    }

    if rng.roll(100) < tuning.scenery_spawn_percent {
        let side = if rng.roll(2) == 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        state.scenery.push(Scenery::new(side));
    }
}

/// Pick a command for idle/demo mode
///
/// Takes turns inside their window, jumps or slides the obstacle about to
/// reach the player and sidesteps what no action can clear.
pub fn autopilot(state: &RunState, vp: &Viewport) -> Command {
    match state.road.pending_turn() {
        Some(Direction::Left) if state.road.in_turn_window() => return Command::TurnLeft,
        Some(Direction::Right) if state.road.in_turn_window() => return Command::TurnRight,
        _ => {}
    }

    let player = &state.player;
    let reach = state.speed.max(1) * 2;
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.lane == player.lane)
        .map(|o| (vp.player_row() - o.span().1, o))
        .filter(|(gap, _)| (1..=reach).contains(gap))
        .min_by_key(|(gap, _)| *gap)
        .map(|(_, o)| o);

    let Some(obstacle) = threat else {
        return Command::None;
    };

    match (obstacle.height, player.action) {
        (HeightClass::Low, Action::Normal) => Command::Jump,
        (HeightClass::High, Action::Normal) => Command::Slide,
        (height, action) if avoids(action, height) => Command::None,
        _ => sidestep(state, vp, reach),
    }
}

/// Move toward the middle first, into a lane with nothing close
fn sidestep(state: &RunState, vp: &Viewport, reach: i32) -> Command {
    let lane = i32::from(state.player.lane);
    let middle = i32::from(LANES) / 2;
    let order = if lane > middle {
        [Command::LaneLeft, Command::LaneRight]
    } else {
        [Command::LaneRight, Command::LaneLeft]
    };

    let row = vp.player_row();
    let clear = |target: i32| {
        (0..i32::from(LANES)).contains(&target)
            && !state.obstacles.iter().any(|o| {
                i32::from(o.lane) == target
                    && o.depth <= row + PLAYER_HEIGHT
                    && row - o.span().1 <= reach * 2
            })
    };

    order
        .into_iter()
        .find(|command| match command {
            Command::LaneLeft => clear(lane - 1),
            Command::LaneRight => clear(lane + 1),
            _ => false,
        })
        .unwrap_or(Command::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{Achievement, AchievementBook, NoAchievements};
    use crate::sim::road::SegmentKind;

    /// Tuning with every random spawn switched off
    fn quiet() -> Tuning {
        Tuning {
            obstacle_spawn_rate: 0,
            item_spawn_percent: 0,
            scenery_spawn_percent: 0,
            ..Tuning::default()
        }
    }

    /// Returns a fixed value (clamped into the bound) and records each bound
    struct Recording {
        value: u32,
        bounds: Vec<u32>,
    }

    impl Recording {
        fn new(value: u32) -> Self {
            Self {
                value,
                bounds: Vec::new(),
            }
        }
    }

    impl RandomSource for Recording {
        fn roll(&mut self, bound: u32) -> u32 {
            self.bounds.push(bound);
            self.value.min(bound.max(1) - 1)
        }
    }

    fn step(clock: &mut SimulationClock<impl RandomSource>, command: Command) -> Vec<GameEvent> {
        let input = TickInput {
            command,
            ..Default::default()
        };
        clock.step(&input, Viewport::default(), &mut NoAchievements)
    }

    fn obstacle_in_reach(vp: &Viewport, lane: u8, height: HeightClass) -> Obstacle {
        Obstacle {
            lane,
            depth: vp.player_row() - 2,
            height,
        }
    }

    #[test]
    fn test_wake_alternates_logic() {
        let mut clock = SimulationClock::new(1, quiet());
        let input = TickInput::default();
        let vp = Viewport::default();

        assert!(clock.wake(&input, vp, &mut NoAchievements).is_none());
        assert_eq!(clock.state.logic_ticks, 0);
        assert_eq!(clock.state.pose.breath, 1);

        assert!(clock.wake(&input, vp, &mut NoAchievements).is_some());
        assert_eq!(clock.state.logic_ticks, 1);
        assert_eq!(clock.state.pose.breath, 2);
        assert_eq!(clock.state.cadence.wakeups, 2);
    }

    #[test]
    fn test_draw_order_when_everything_spawns() {
        let mut clock = SimulationClock::with_source(1, Recording::new(0), Tuning::default());
        step(&mut clock, Command::None);

        assert_eq!(clock.rng().bounds, vec![10, 3, 2, 100, 3, 100, 100, 2]);
        assert_eq!(clock.state.obstacles.len(), 1);
        assert_eq!(clock.state.obstacles[0].height, HeightClass::Low);
        assert_eq!(clock.state.obstacles[0].lane, 0);
        assert_eq!(clock.state.items[0].kind, ItemKind::Shield);
        assert_eq!(clock.state.scenery[0].side, Direction::Left);
    }

    #[test]
    fn test_draw_order_when_nothing_spawns() {
        let mut clock = SimulationClock::with_source(1, Recording::new(u32::MAX), Tuning::default());
        step(&mut clock, Command::None);
        assert_eq!(clock.rng().bounds, vec![10, 100, 100]);
        assert!(clock.state.obstacles.is_empty());
    }

    #[test]
    fn test_segment_roll_comes_first() {
        let mut clock = SimulationClock::with_source(1, Recording::new(u32::MAX), Tuning::default());
        clock.state.road.set_remaining(1);
        step(&mut clock, Command::None);
        assert_eq!(clock.rng().bounds, vec![100, 10, 100, 100]);
        // Roll 99 in the easy tier is a right curve
        assert_eq!(
            clock.state.road.kind(),
            SegmentKind::Curve(Direction::Right)
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let vp = Viewport::default();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut a = SimulationClock::new(99_999, Tuning::default());
        let mut b = SimulationClock::new(99_999, Tuning::default());
        for _ in 0..600 {
            let ea = a.wake(&input, vp, &mut NoAchievements);
            let eb = b.wake(&input, vp, &mut NoAchievements);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.state, b.state);
        assert!(a.state.score.distance > 0);
    }

    #[test]
    fn test_distance_and_speed() {
        let mut clock = SimulationClock::new(1, quiet());
        for _ in 0..10 {
            step(&mut clock, Command::None);
        }
        assert_eq!(clock.state.score.distance, 10);
        assert_eq!(clock.state.speed, 1);

        clock.state.score.add_bonus(100);
        step(&mut clock, Command::None);
        assert_eq!(clock.state.speed, 3);
    }

    #[test]
    fn test_collision_hits_player() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        clock
            .state
            .obstacles
            .push(obstacle_in_reach(&vp, 1, HeightClass::Low));

        let events = step(&mut clock, Command::None);
        assert_eq!(events, vec![GameEvent::Hit { shielded: false }]);
        assert_eq!(clock.state.player.health, MAX_HEALTH - 1);
        assert!(clock.state.pursuer_awakened);
        assert!(clock.state.pursuer_visible());

        // Still overlapping, but invincible
        let events = step(&mut clock, Command::None);
        assert!(events.is_empty());
        assert_eq!(clock.state.hit_count, 1);
    }

    #[test]
    fn test_jump_command_clears_low_obstacle() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        clock
            .state
            .obstacles
            .push(obstacle_in_reach(&vp, 1, HeightClass::Low));

        let events = step(&mut clock, Command::Jump);
        assert!(events.is_empty());
        assert_eq!(clock.state.player.health, MAX_HEALTH);
    }

    #[test]
    fn test_shield_absorbs_and_removes_obstacle() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        clock.state.player.shield = true;
        clock
            .state
            .obstacles
            .push(obstacle_in_reach(&vp, 1, HeightClass::Full));

        let events = step(&mut clock, Command::None);
        assert_eq!(events, vec![GameEvent::Hit { shielded: true }]);
        assert!(clock.state.obstacles.is_empty());
        assert!(!clock.state.player.shield);
        assert_eq!(clock.state.player.health, MAX_HEALTH);
        assert!(!clock.state.pursuer_awakened);
    }

    #[test]
    fn test_game_over_freezes_run() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        clock.state.player.health = 1;
        clock
            .state
            .obstacles
            .push(obstacle_in_reach(&vp, 1, HeightClass::High));

        let events = step(&mut clock, Command::None);
        assert_eq!(
            events,
            vec![GameEvent::Hit { shielded: false }, GameEvent::GameOver]
        );
        assert_eq!(clock.state.phase, RunPhase::GameOver);
        assert!(clock.state.caught);

        let before = clock.state.clone();
        assert!(step(&mut clock, Command::Jump).is_empty());
        assert_eq!(clock.state, before);
    }

    #[test]
    fn test_pause_toggle() {
        let mut clock = SimulationClock::new(1, quiet());
        let vp = Viewport::default();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        clock.step(&pause, vp, &mut NoAchievements);
        assert_eq!(clock.state.phase, RunPhase::Paused);
        clock.step(&TickInput::default(), vp, &mut NoAchievements);
        assert_eq!(clock.state.score.distance, 0);

        clock.step(&pause, vp, &mut NoAchievements);
        assert_eq!(clock.state.phase, RunPhase::Playing);
        assert_eq!(clock.state.score.distance, 1);
    }

    #[test]
    fn test_turn_success_scores() {
        let mut clock = SimulationClock::new(1, quiet());
        clock
            .state
            .road
            .force_segment(SegmentKind::Turn(Direction::Left));
        clock.state.road.set_remaining(TURN_WINDOW_TOLERANCE - 10);

        let events = step(&mut clock, Command::TurnLeft);
        assert_eq!(events, vec![GameEvent::TurnSuccess]);
        assert_eq!(clock.state.score.bonus, SCORE_PER_TURN);
        assert_eq!(clock.state.road.current_curvature(), 0.0);
    }

    #[test]
    fn test_wrong_turn_penalizes_but_allows_retry() {
        let mut clock = SimulationClock::new(1, quiet());
        clock
            .state
            .road
            .force_segment(SegmentKind::Turn(Direction::Right));
        clock.state.road.set_remaining(TURN_WINDOW_TOLERANCE - 10);

        let events = step(&mut clock, Command::TurnLeft);
        assert_eq!(
            events,
            vec![
                GameEvent::TurnFail { missed: false },
                GameEvent::Hit { shielded: false }
            ]
        );
        assert_eq!(clock.state.player.health, MAX_HEALTH - 1);

        let events = step(&mut clock, Command::TurnRight);
        assert_eq!(events, vec![GameEvent::TurnSuccess]);
    }

    #[test]
    fn test_missed_turn_penalizes() {
        let mut clock = SimulationClock::new(1, quiet());
        clock
            .state
            .road
            .force_segment(SegmentKind::Turn(Direction::Left));
        clock.state.road.set_remaining(1);

        let events = step(&mut clock, Command::None);
        assert_eq!(
            events,
            vec![
                GameEvent::TurnFail { missed: true },
                GameEvent::Hit { shielded: false }
            ]
        );
        assert_eq!(clock.state.road.kind(), SegmentKind::Straight);
    }

    #[test]
    fn test_off_screen_obstacle_removed_once() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        clock.state.obstacles.push(Obstacle {
            lane: 1,
            depth: vp.depth_bound(),
            height: HeightClass::Full,
        });

        let events = step(&mut clock, Command::None);
        assert!(events.is_empty());
        assert!(clock.state.obstacles.is_empty());
        assert_eq!(clock.state.score.combo, 1);
        assert_eq!(clock.state.score.bonus, SCORE_PER_OBSTACLE);

        step(&mut clock, Command::None);
        assert_eq!(clock.state.score.combo, 1);
        assert_eq!(clock.state.player.health, MAX_HEALTH);
    }

    #[test]
    fn test_items_collected() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        let row = vp.player_row();
        clock.state.items.push(Item {
            lane: 1,
            depth: row - 1,
            kind: ItemKind::Consumable,
        });
        clock.state.items.push(Item {
            lane: 1,
            depth: row - 2,
            kind: ItemKind::Shield,
        });

        let events = step(&mut clock, Command::None);
        assert_eq!(
            events,
            vec![
                GameEvent::ItemCollected(ItemKind::Consumable),
                GameEvent::ItemCollected(ItemKind::Shield)
            ]
        );
        assert!(clock.state.items.is_empty());
        assert!(clock.state.player.shield);
        assert_eq!(clock.state.score.bonus, SCORE_PER_ITEM);
    }

    #[test]
    fn test_pursuer_closes_in_after_hit() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        let start = clock.state.pursuer.depth;
        step(&mut clock, Command::None);
        assert_eq!(clock.state.pursuer.depth, start);

        let mut events = Vec::new();
        clock.state.penalize(&mut events);
        for _ in 0..PURSUER_VISIBLE_TICKS {
            step(&mut clock, Command::None);
        }
        assert_eq!(
            clock.state.pursuer.depth,
            clock.state.pursuer.target(vp.player_row())
        );
        assert!(!clock.state.pursuer_visible());
        assert_eq!(clock.state.ticks_since_awakened, PURSUER_VISIBLE_TICKS);
    }

    #[test]
    fn test_achievements_reported_once() {
        let mut clock = SimulationClock::new(1, quiet());
        let mut book = AchievementBook::new();
        let vp = Viewport::default();

        let events = clock.step(&TickInput::default(), vp, &mut book);
        assert_eq!(
            events,
            vec![GameEvent::AchievementUnlocked(Achievement::FirstStep)]
        );
        let events = clock.step(&TickInput::default(), vp, &mut book);
        assert!(events.is_empty());
    }

    #[test]
    fn test_reset_starts_fresh() {
        let mut clock = SimulationClock::new(5, quiet());
        step(&mut clock, Command::LaneLeft);
        clock.reset();
        assert_eq!(clock.state, RunState::new(5, clock.tuning()));
    }

    #[test]
    fn test_autopilot_reacts_to_obstacles() {
        let vp = Viewport::default();
        let tuning = quiet();
        let mut state = RunState::new(1, &tuning);
        let row = vp.player_row();
        let approaching = |height| Obstacle {
            lane: 1,
            depth: row - OBSTACLE_HEIGHT,
            height,
        };

        assert_eq!(autopilot(&state, &vp), Command::None);

        state.obstacles = vec![approaching(HeightClass::Low)];
        assert_eq!(autopilot(&state, &vp), Command::Jump);

        state.obstacles = vec![approaching(HeightClass::High)];
        assert_eq!(autopilot(&state, &vp), Command::Slide);

        state.obstacles = vec![approaching(HeightClass::Full)];
        assert_eq!(autopilot(&state, &vp), Command::LaneRight);

        state.player.lane = 2;
        state.obstacles = vec![Obstacle {
            lane: 2,
            ..approaching(HeightClass::Full)
        }];
        assert_eq!(autopilot(&state, &vp), Command::LaneLeft);
    }

    #[test]
    fn test_autopilot_takes_turns() {
        let vp = Viewport::default();
        let mut state = RunState::new(1, &quiet());
        state.road.force_segment(SegmentKind::Turn(Direction::Right));
        assert_eq!(autopilot(&state, &vp), Command::None);
        state.road.set_remaining(TURN_WINDOW_TOLERANCE);
        assert_eq!(autopilot(&state, &vp), Command::TurnRight);
    }

    #[test]
    fn test_autopilot_jumps_in_run() {
        let vp = Viewport::default();
        let mut clock = SimulationClock::new(1, quiet());
        clock.state.obstacles.push(Obstacle {
            lane: 1,
            depth: vp.player_row() - OBSTACLE_HEIGHT - 1,
            height: HeightClass::Low,
        });
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..12 {
            let events = clock.step(&input, vp, &mut NoAchievements);
            assert!(!events.contains(&GameEvent::Hit { shielded: false }));
        }
        assert_eq!(clock.state.player.health, MAX_HEALTH);
    }
}
