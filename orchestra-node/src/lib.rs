//! # orchestra-node
//!
//! A `no_std`, zero-allocation core for one node of a ring of small
//! devices that together run the Rule 30 cellular automaton and turn it into
//! light and sound. Each node owns a 32-cell slice of one automaton that
//! wraps around the whole ring; neighbours swap their edge cells over
//! one-way serial links every generation, with no shared clock.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Automaton | [`automaton`] | Rule 30 slice, 8-generation history |
//! | Transport | [`ring`] | Startup barrier, relay routing, byte queues |
//! | Sound | [`sonify`] | Features, triangle/sleep policy, per-role mix |
//! | Control | [`coordinator`] | The 64 Hz receive/advance/publish cycle |
//! | Audio | [`audio`] / [`engine`] | 16384 Hz mixer, oscillators, envelope, filter |
//! | Output | [`display`] | Generation history on an LED matrix |
//! | Shared | [`params`] | Atomic cells from the control task to the audio task |
//!
//! ## Quick start
//!
//! ```ignore
//! use orchestra_node::audio::AudioTask;
//! use orchestra_node::config::NodeConfig;
//! use orchestra_node::coordinator::CycleCoordinator;
//! use orchestra_node::display::Max7219;
//! use orchestra_node::params::SharedParams;
//!
//! static PARAMS: SharedParams = SharedParams::new();
//!
//! let config = NodeConfig::for_node(NODE_ID)?;
//! let mut panel = Max7219::new(spi, cs);
//! panel.init()?;
//!
//! let mut node = CycleCoordinator::new(config, seed, &PARAMS);
//! let mut audio = AudioTask::new(config.role, seed);
//!
//! // Control timer, 64 Hz:
//! node.control_tick(&mut uart, &mut panel, &PARAMS);
//!
//! // Audio timer, 16384 Hz:
//! dac.write(audio.tick(&PARAMS));
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `max7219` | yes | MAX7219 LED matrix driver (requires `embedded-hal`) |
//!
//! ## Parameters
//!
//! - **Slice width:** 4 bytes, 32 cells ([`constants::WIDTH`])
//! - **History:** 8 generations ([`constants::HISTORY_DEPTH`])
//! - **Ring:** 4 nodes ([`constants::RING_SIZE`])
//! - **Control rate:** 64 Hz ([`constants::CONTROL_RATE`])
//! - **Audio rate:** 16384 Hz ([`constants::AUDIO_RATE`])

#![no_std]

pub mod constants;
pub mod config;
pub mod fixed;
pub mod automaton;
pub mod ring;
pub mod sonify;
pub mod engine;
pub mod params;
pub mod audio;
pub mod display;
pub mod coordinator;
