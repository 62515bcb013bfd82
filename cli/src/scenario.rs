//! Scripted dry-runs: replay weights, clock moves and governance calls
//! against in-memory collaborators.

use anyhow::Context;
use charter_governance::{
    Collaborators, GovernanceConfig, GovernanceEngine, GovernanceError, GovernanceEvent,
    GovernanceParameters, ProposalDetails,
};
use charter_instructions::{InstructionDocument, InstructionStore};
use charter_nullables::{NullClock, NullOracle};
use charter_types::{AccountId, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A scenario file.
///
/// ```toml
/// start_time = 100
/// total_weight = 1000000
///
/// [weights]
/// proposer = 200000
/// alice = 650000
///
/// [[step]]
/// action = "create"
/// proposer = "proposer"
/// title = "Be concise"
/// payload = "You are a concise agent."
///
/// [[step]]
/// action = "advance"
/// units = 1
/// ```
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub start_time: u64,
    /// Pinned total weight; the sum of `weights` when absent.
    #[serde(default)]
    pub total_weight: Option<u64>,
    #[serde(default)]
    pub weights: BTreeMap<String, u64>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Advance {
        units: u64,
    },
    SetWeight {
        account: String,
        weight: u64,
    },
    Create {
        proposer: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
        payload: String,
    },
    Vote {
        proposal: u64,
        voter: String,
        support: bool,
    },
    Cancel {
        proposal: u64,
        caller: String,
    },
    Execute {
        proposal: u64,
    },
    UpdateParameters {
        caller: String,
        voting_period: u64,
        proposal_threshold: u64,
        quorum_threshold_bps: u32,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Advance { .. } => "advance",
            Self::SetWeight { .. } => "set_weight",
            Self::Create { .. } => "create",
            Self::Vote { .. } => "vote",
            Self::Cancel { .. } => "cancel",
            Self::Execute { .. } => "execute",
            Self::UpdateParameters { .. } => "update_parameters",
        }
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("parsing scenario")
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

/// One line of simulation output.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OutputLine<'a> {
    Event(&'a GovernanceEvent),
    Rejected {
        step: usize,
        action: &'static str,
        error: String,
    },
}

/// Final state after all steps ran.
#[derive(Debug, Serialize)]
pub struct Report {
    pub proposals: Vec<ProposalDetails>,
    pub instructions: InstructionDocument,
    pub rejected_steps: usize,
}

/// Run `scenario` and pass every event (and rejected step) to `emit` as a
/// JSON line.
pub fn run(
    config: &GovernanceConfig,
    scenario: &Scenario,
    strict: bool,
    mut emit: impl FnMut(String),
) -> anyhow::Result<Report> {
    let oracle = Arc::new(NullOracle::new());
    for (account, weight) in &scenario.weights {
        oracle.set_weight(account.as_str(), *weight as u128);
    }
    if let Some(total) = scenario.total_weight {
        oracle.set_total(total as u128);
    }
    let clock = Arc::new(NullClock::new(scenario.start_time));
    let governor = config.governor_id()?;
    let store = Arc::new(InstructionStore::new(
        governor.clone(),
        config.genesis_instructions.clone(),
    ));

    let mut engine = GovernanceEngine::new(
        config.admin_id()?,
        governor,
        config.parameters()?,
        Collaborators {
            oracle: oracle.clone(),
            clock: clock.clone(),
            store: store.clone(),
        },
    );
    let buffer: Arc<Mutex<Vec<GovernanceEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buffer);
    engine.subscribe(Box::new(move |event| {
        if let Ok(mut events) = sink.lock() {
            events.push(event.clone());
        }
    }));

    let mut rejected_steps = 0;
    for (index, step) in scenario.steps.iter().enumerate() {
        let result = apply(&mut engine, &oracle, &clock, step);

        let drained: Vec<GovernanceEvent> = buffer
            .lock()
            .map(|mut events| events.drain(..).collect())
            .unwrap_or_default();
        for event in &drained {
            emit(serde_json::to_string(&OutputLine::Event(event))?);
        }

        if let Err(e) = result {
            tracing::debug!(step = index, action = step.name(), error = %e, "step rejected");
            if strict {
                return Err(e).with_context(|| format!("step {index} ({})", step.name()));
            }
            rejected_steps += 1;
            emit(serde_json::to_string(&OutputLine::Rejected {
                step: index,
                action: step.name(),
                error: e.to_string(),
            })?);
        }
    }

    let proposals = engine
        .proposals()
        .map(|p| engine.proposal_details(p.id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Report {
        proposals,
        instructions: store.document()?,
        rejected_steps,
    })
}

fn apply(
    engine: &mut GovernanceEngine,
    oracle: &NullOracle,
    clock: &NullClock,
    step: &Step,
) -> Result<(), GovernanceError> {
    match step {
        Step::Advance { units } => clock.advance(*units),
        Step::SetWeight { account, weight } => oracle.set_weight(account.as_str(), *weight as u128),
        Step::Create {
            proposer,
            title,
            description,
            payload,
        } => {
            engine.create_proposal(
                &AccountId::new(proposer.as_str()),
                title.as_str(),
                description.as_str(),
                payload.as_str(),
            )?;
        }
        Step::Vote {
            proposal,
            voter,
            support,
        } => {
            engine.cast_vote(
                ProposalId::new(*proposal),
                &AccountId::new(voter.as_str()),
                *support,
            )?;
        }
        Step::Cancel { proposal, caller } => {
            engine.cancel_proposal(ProposalId::new(*proposal), &AccountId::new(caller.as_str()))?
        }
        Step::Execute { proposal } => engine.execute_proposal(ProposalId::new(*proposal))?,
        Step::UpdateParameters {
            caller,
            voting_period,
            proposal_threshold,
            quorum_threshold_bps,
        } => {
            let params = GovernanceParameters::new(
                *voting_period,
                *proposal_threshold as u128,
                *quorum_threshold_bps,
            )?;
            engine.update_governance_parameters(&AccountId::new(caller.as_str()), params)?
        }
    }
    Ok(())
}
