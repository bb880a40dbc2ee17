//! Campaign execution
//!
//! A campaign sends one generated message to each destination in order. Launch
//! validation turns a [`CampaignRequest`] into a [`CampaignSpec`]; the
//! [`CampaignSequencer`] then processes items one at a time, and a
//! [`CampaignRun`] streams its progress from a background worker.

pub mod prompt;
pub mod request;
pub mod run;
pub mod sequencer;
pub mod state;

pub use prompt::{render_system_prompt, render_user_prompt};
pub use request::{parse_destinations, CampaignRequest, CampaignSpec, KNOWN_LANGUAGES};
pub use run::{CampaignLauncher, CampaignRun};
pub use sequencer::{
    CampaignEvent, CampaignReport, CampaignSequencer, SequencerConfig, StepOutcome,
};
pub use state::{CampaignSnapshot, CampaignSummary, ItemState, ItemStatus, TransitionError};
