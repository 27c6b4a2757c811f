//! Control-rate cycle: receive, advance, render, sonify, publish.
//!
//! [`CycleCoordinator::control_tick`] is called at [`CONTROL_RATE`] from the
//! control task. Within one tick it:
//!
//! 1. drains the link, relaying and collecting boundary bits
//! 2. runs the startup handshake until the ring is up
//! 3. advances one generation when both boundary bits are in (the origin
//!    node additionally waits out its pacing interval)
//! 4. refreshes the control-rate sound parameters
//!
//! ```text
//!            ┌──────────────┐  barrier   ┌────────────────────────┐
//!  start ──▶ │ AwaitingReady │ ────────▶ │ WaitingForBoundaryBits │ ◀─┐
//!            └──────────────┘            └────────────────────────┘   │
//!                                          both bits + pace  │        │
//!                                                            ▼        │
//!                                                     ┌───────────┐   │
//!                                                     │ Advancing │ ──┘
//!                                                     └───────────┘
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::automaton::AutomatonGrid;
use crate::config::NodeConfig;
use crate::constants::CONTROL_RATE;
use crate::display::{Display, DisplayRenderer};
use crate::engine::{AttackDecay, Envelope, Oscillator, TableOscillator};
use crate::params::{SharedParams, DEFAULT_CUTOFF};
use crate::ring::{ByteLink, RingProtocol, RoutingDecision};
use crate::sonify::{
    extract_features, filter_sweep_hz, glitch_gate, pick_pitch, popping_hz, Features, NodeRole,
    SleepTransition, SonificationController,
};

/// Saw frequency before the first population update (Hz).
pub const SAW_HZ: f32 = 10.0;

/// Filter modulator frequency before the first population update (Hz).
pub const FILTER_MOD_HZ: f32 = 0.03;

/// Where the node is in its generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Startup barrier not complete.
    AwaitingReady,
    /// Running, waiting for a neighbour's bit or the pacing interval.
    WaitingForBoundaryBits,
    /// Computing the next generation.
    Advancing,
}

/// Everything the control task owns.
pub struct NodeContext {
    config: NodeConfig,
    grid: AutomatonGrid,
    protocol: RingProtocol,
    sonifier: SonificationController,
    renderer: DisplayRenderer,
    envelope: AttackDecay,
    /// Slow cosine sweeping the filter cutoff.
    filter_mod: TableOscillator,
    rng: SmallRng,
    features: Features,
    /// Control ticks left before the next generation may start.
    pace_countdown: u16,
}

impl NodeContext {
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn grid(&self) -> &AutomatonGrid {
        &self.grid
    }

    pub fn protocol(&self) -> &RingProtocol {
        &self.protocol
    }

    pub fn sonifier(&self) -> &SonificationController {
        &self.sonifier
    }

    /// Features of the history as of the last generation.
    pub fn features(&self) -> Features {
        self.features
    }
}

/// Drives one node through the handshake and the generation cycle.
///
/// # Example
///
/// ```ignore
/// static PARAMS: SharedParams = SharedParams::new();
///
/// let config = NodeConfig::for_node(NODE_ID)?;
/// let mut node = CycleCoordinator::new(config, seed, &PARAMS);
/// let mut audio = AudioTask::new(config.role, seed);
///
/// // 64 Hz timer:
/// node.control_tick(&mut uart, &mut panel, &PARAMS);
///
/// // 16384 Hz timer:
/// dac.write(audio.tick(&PARAMS));
/// ```
pub struct CycleCoordinator {
    ctx: NodeContext,
    state: CycleState,
}

impl CycleCoordinator {
    /// Seed the grid and all randomness from `seed` and publish the node's
    /// starting sound parameters.
    pub fn new(config: NodeConfig, seed: u64, params: &SharedParams) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let grid = AutomatonGrid::seeded(&mut rng);
        Self::build(config, grid, rng, params)
    }

    /// Like [`new`](Self::new) but starting from a known grid.
    pub fn with_grid(
        config: NodeConfig,
        grid: AutomatonGrid,
        seed: u64,
        params: &SharedParams,
    ) -> Self {
        Self::build(config, grid, SmallRng::seed_from_u64(seed), params)
    }

    fn build(
        config: NodeConfig,
        grid: AutomatonGrid,
        mut rng: SmallRng,
        params: &SharedParams,
    ) -> Self {
        let phase_offset: u8 = rng.gen();
        let mut filter_mod = TableOscillator::cosine(CONTROL_RATE as u32);
        filter_mod.set_frequency(FILTER_MOD_HZ);
        let features = extract_features(grid.history());

        let mut ctx = NodeContext {
            config,
            protocol: RingProtocol::new(&config),
            sonifier: SonificationController::new(config.sleep_chance, phase_offset),
            renderer: DisplayRenderer::new(true),
            envelope: AttackDecay::new(CONTROL_RATE),
            filter_mod,
            rng,
            features,
            grid,
            pace_countdown: 0,
        };

        params.set_active(true);
        params.set_tone_hz(config.tone_hz);
        params.set_saw_hz(SAW_HZ);
        params.set_cutoff(DEFAULT_CUTOFF);
        params.set_population(features.population);
        if config.role == NodeRole::A {
            apply_population_voice(&mut ctx, params);
        }
        debug!(
            node = config.id.get(),
            phase_offset,
            population = features.population,
            "node initialised"
        );

        CycleCoordinator {
            ctx,
            state: CycleState::AwaitingReady,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn context(&self) -> &NodeContext {
        &self.ctx
    }

    /// One control tick. Never blocks; link and display failures are logged
    /// and the cycle carries on.
    pub fn control_tick<L, D>(
        &mut self,
        link: &mut L,
        display: &mut D,
        params: &SharedParams,
    ) -> CycleState
    where
        L: ByteLink,
        D: Display,
    {
        self.drain(link);

        if self.ctx.config.role.uses_noise() {
            params.set_noise_phase(self.ctx.rng.gen());
        }

        if !self.ctx.protocol.is_running() {
            if let Some(sentinel) = self.ctx.protocol.poll_ready() {
                send(link, sentinel);
            }
        }

        self.state = self.next_state();
        if self.state == CycleState::Advancing {
            self.advance(link, display, params);
            self.state = CycleState::WaitingForBoundaryBits;
        }

        self.update_control_rate(params);
        self.state
    }

    fn drain<L: ByteLink>(&mut self, link: &mut L) {
        while let Some(byte) = link.read() {
            let decision = self
                .ctx
                .protocol
                .on_message_received(byte, self.ctx.grid.generation());
            // First contact at generation 0: our bits go out ahead of the relay.
            if self.ctx.protocol.take_publish_request() {
                self.publish(link);
            }
            match decision {
                RoutingDecision::Relay => send(link, byte),
                RoutingDecision::Drop => {}
                RoutingDecision::CompleteBarrier => self.publish(link),
            }
        }
    }

    fn next_state(&mut self) -> CycleState {
        if !self.ctx.protocol.is_running() {
            return CycleState::AwaitingReady;
        }
        if self.state == CycleState::AwaitingReady {
            self.ctx.pace_countdown = self.ctx.config.pace_ticks;
        }
        self.ctx.pace_countdown = self.ctx.pace_countdown.saturating_sub(1);

        if self.ctx.pace_countdown == 0 && self.ctx.protocol.bits().is_complete() {
            CycleState::Advancing
        } else {
            CycleState::WaitingForBoundaryBits
        }
    }

    fn advance<L, D>(&mut self, link: &mut L, display: &mut D, params: &SharedParams)
    where
        L: ByteLink,
        D: Display,
    {
        let Some((left, right)) = self.ctx.protocol.take_boundary_bits() else {
            return;
        };
        let ctx = &mut self.ctx;

        if ctx.sonifier.sleep_due(ctx.grid.generation()) {
            let draw = ctx.rng.gen_range(0..100);
            match ctx.sonifier.apply_sleep_draw(draw) {
                Some(SleepTransition::FellAsleep) => {
                    debug!(node = ctx.config.id.get(), draw, "falling asleep")
                }
                Some(SleepTransition::WokeUp) => {
                    debug!(node = ctx.config.id.get(), draw, "waking up")
                }
                None => {}
            }
        }

        ctx.grid.advance(left, right);
        let active = ctx.sonifier.is_active();
        params.set_active(active);

        if let Err(error) = ctx.renderer.render(display, &ctx.grid, active) {
            warn!(node = ctx.config.id.get(), ?error, "display refresh failed");
        }

        ctx.features = extract_features(ctx.grid.history());
        params.set_population(ctx.features.population);
        if ctx.config.role == NodeRole::A {
            apply_population_voice(ctx, params);
        }

        let generation = ctx.grid.generation();
        if let Some(trigger) = ctx
            .sonifier
            .evaluate_triangle(generation, ctx.features.longest_zero_run)
        {
            ctx.envelope.start(trigger.attack_ms, trigger.decay_ms);
            match ctx.config.role {
                NodeRole::B => params.set_tone_hz(pick_pitch(&mut ctx.rng) as f32),
                NodeRole::C => params.set_saw_hz((pick_pitch(&mut ctx.rng) / 2) as f32),
                NodeRole::A | NodeRole::D => {}
            }
        }

        self.publish(link);
        self.ctx.pace_countdown = self.ctx.config.pace_ticks;
    }

    fn publish<L: ByteLink>(&mut self, link: &mut L) {
        let byte = self
            .ctx
            .protocol
            .encode_own(self.ctx.grid.left_edge(), self.ctx.grid.right_edge());
        send(link, byte);
    }

    fn update_control_rate(&mut self, params: &SharedParams) {
        let ctx = &mut self.ctx;
        let sweep = ctx.filter_mod.next() as i32;
        params.set_cutoff((DEFAULT_CUTOFF as i32 + sweep / 2) as u8);

        if ctx.config.role == NodeRole::D {
            params.set_glitch_gain(glitch_gate(&mut ctx.rng, ctx.features.population));
        }

        params.set_envelope(ctx.envelope.next_value());
    }
}

/// Role A: the population drives the popping saw and the filter sweep.
fn apply_population_voice(ctx: &mut NodeContext, params: &SharedParams) {
    params.set_saw_hz(popping_hz(ctx.features.population));
    ctx.filter_mod
        .set_frequency(filter_sweep_hz(ctx.features.population));
}

fn send<L: ByteLink>(link: &mut L, byte: u8) {
    if let Err(error) = link.write(byte) {
        warn!(byte, ?error, "ring transmit failed");
    }
}
