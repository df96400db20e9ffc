//! Thin, token-driven composition root: `World → wrapper → Model → Learner
//! → Selector → Agent`. Elaborate CLI UX is explicitly out of scope — this
//! is wiring, not a user interface.

use std::fs::File;
use std::io::Write;
use std::process::ExitCode;

use episodic_rl::agent::{Agent, AgentConfig};
use episodic_rl::decay::Exponential;
use episodic_rl::dyna::{DynaConfig, DynaModel};
use episodic_rl::error::ConfigError;
use episodic_rl::interrupt;
use episodic_rl::learning::{Advantage, Learning, QLearning, TdConfig};
use episodic_rl::model::{FeedForward, FeedForwardConfig, GaussianMixture, GaussianMixtureConfig, Model, RecurrentModel, Table};
use episodic_rl::selector::{AdaptiveSoftmax, EpsilonGreedy, Selector, Softmax};
use episodic_rl::world::wrappers::{OneHot, Range, Scale};
use episodic_rl::world::{GridWorld, PolarGridWorld, TMazeWorld, World};

/// Default kappa for the `advantage` learner: no CLI token exposes it, so a
/// middling sharpening factor is baked in (see DESIGN.md).
const ADVANTAGE_KAPPA: f32 = 0.5;

#[derive(Clone, Copy)]
enum WorldKind {
    Grid,
    PolarGrid,
    TMaze,
}

#[derive(Clone, Copy)]
enum ModelKind {
    Table,
    Gaussian,
    Perceptron,
    StackedGru,
    StackedLstm,
}

#[derive(Clone, Copy)]
enum LearnerKind {
    QLearning,
    Advantage,
}

#[derive(Clone, Copy)]
enum SelectorKind {
    Softmax,
    AdaptiveSoftmax,
    EGreedy,
}

#[derive(Default)]
struct Tokens {
    world: Option<WorldKind>,
    random_initial: bool,
    pomdp: bool,
    oneofn: bool,
    model: Option<ModelKind>,
    learner: Option<LearnerKind>,
    learner_index: Option<usize>,
    selector: Option<SelectorKind>,
    selector_index: Option<usize>,
    dyna: bool,
    rospendulum: bool,
}

fn parse(args: &[String]) -> Tokens {
    let mut t = Tokens::default();
    for (i, tok) in args.iter().enumerate() {
        match tok.as_str() {
            "gridworld" => t.world = Some(WorldKind::Grid),
            "polargridworld" => t.world = Some(WorldKind::PolarGrid),
            "tmaze" => t.world = Some(WorldKind::TMaze),
            "randominitial" => t.random_initial = true,
            "pomdp" => t.pomdp = true,
            "oneofn" => t.oneofn = true,
            "table" => t.model = Some(ModelKind::Table),
            "gaussian" => t.model = Some(ModelKind::Gaussian),
            "perceptron" => t.model = Some(ModelKind::Perceptron),
            "stackedgru" => t.model = Some(ModelKind::StackedGru),
            "stackedlstm" => t.model = Some(ModelKind::StackedLstm),
            "qlearning" => {
                t.learner = Some(LearnerKind::QLearning);
                t.learner_index = Some(i);
            }
            "advantage" => {
                t.learner = Some(LearnerKind::Advantage);
                t.learner_index = Some(i);
            }
            "softmax" => {
                t.selector = Some(SelectorKind::Softmax);
                t.selector_index.get_or_insert(i);
            }
            "adaptivesoftmax" => {
                t.selector = Some(SelectorKind::AdaptiveSoftmax);
                t.selector_index.get_or_insert(i);
            }
            "egreedy" => {
                t.selector = Some(SelectorKind::EGreedy);
                t.selector_index.get_or_insert(i);
            }
            "dyna" => t.dyna = true,
            "rospendulum" => t.rospendulum = true,
            other => log::debug!("ignoring unrecognized token {other:?}"),
        }
    }
    t
}

fn build_world(kind: WorldKind, random_initial: bool) -> Box<dyn World> {
    match kind {
        WorldKind::Grid => {
            let mut w = GridWorld::standard();
            if random_initial {
                w = w.with_random_initial();
            }
            Box::new(w)
        }
        WorldKind::PolarGrid => {
            let mut w = PolarGridWorld::standard();
            if random_initial {
                w = w.with_random_initial();
            }
            Box::new(w)
        }
        WorldKind::TMaze => Box::new(TMazeWorld::new(8, 1000)),
    }
}

/// Per-coordinate integer ranges for `oneofn`, matched to each world's own
/// geometry (`gridworld`/`polargridworld`/`tmaze` §6). Zeroed-out `pomdp`
/// coordinates still get a one-cell range — a single always-active bin,
/// correct but uninformative, which is what hiding that coordinate implies.
fn one_hot_ranges(kind: WorldKind, pomdp: bool) -> Vec<Range> {
    let mut ranges = match kind {
        WorldKind::Grid => vec![Range::new(0.0, 9.0), Range::new(0.0, 4.0)],
        WorldKind::PolarGrid => vec![Range::new(0.0, 3.0), Range::new(0.0, 9.0)],
        WorldKind::TMaze => vec![Range::new(0.0, 8.0), Range::new(-1.0, 1.0)],
    };
    if pomdp {
        ranges[1] = Range::new(0.0, 0.0);
    }
    ranges
}

fn build_model(kind: ModelKind, value_size: usize, num_actions: usize, state_size: usize) -> Box<dyn Model> {
    match kind {
        ModelKind::Table => Box::new(Table::new(value_size)),
        ModelKind::Gaussian => Box::new(GaussianMixture::new(num_actions, value_size, GaussianMixtureConfig::default())),
        ModelKind::Perceptron => Box::new(FeedForward::new(state_size, num_actions, value_size, FeedForwardConfig::default())),
        ModelKind::StackedGru | ModelKind::StackedLstm => Box::new(RecurrentModel::new(num_actions, value_size)),
    }
}

fn build_selector(selector_kind: SelectorKind, learner_kind: LearnerKind, td_config: TdConfig) -> Box<dyn Selector> {
    match (selector_kind, learner_kind) {
        (SelectorKind::Softmax, LearnerKind::QLearning) => Box::new(Softmax::new(QLearning::new(td_config), 1.0)),
        (SelectorKind::Softmax, LearnerKind::Advantage) => {
            Box::new(Softmax::new(Advantage::new(td_config, ADVANTAGE_KAPPA), 1.0))
        }
        (SelectorKind::AdaptiveSoftmax, LearnerKind::QLearning) => {
            Box::new(AdaptiveSoftmax::new(QLearning::new(td_config), 0.9))
        }
        (SelectorKind::AdaptiveSoftmax, LearnerKind::Advantage) => {
            Box::new(AdaptiveSoftmax::new(Advantage::new(td_config, ADVANTAGE_KAPPA), 0.9))
        }
        (SelectorKind::EGreedy, LearnerKind::QLearning) => Box::new(EpsilonGreedy::new(
            QLearning::new(td_config),
            Exponential::new(1e-3, 1.0, 0.05).expect("valid decay bounds"),
        )),
        (SelectorKind::EGreedy, LearnerKind::Advantage) => Box::new(EpsilonGreedy::new(
            Advantage::new(td_config, ADVANTAGE_KAPPA),
            Exponential::new(1e-3, 1.0, 0.05).expect("valid decay bounds"),
        )),
    }
}

fn selector_value_size(selector_kind: SelectorKind, learner_kind: LearnerKind, num_actions: usize) -> usize {
    // Mirrors build_selector's wrapping exactly, without constructing one.
    let learner_size = match learner_kind {
        LearnerKind::QLearning => Learning::value_size(&QLearning::default(), num_actions),
        LearnerKind::Advantage => Learning::value_size(&Advantage::new(TdConfig::default(), ADVANTAGE_KAPPA), num_actions),
    };
    match selector_kind {
        SelectorKind::AdaptiveSoftmax => learner_size + 1,
        SelectorKind::Softmax | SelectorKind::EGreedy => learner_size,
    }
}

fn run(args: &[String]) -> Result<(), ConfigError> {
    let t = parse(args);

    if t.rospendulum {
        log::warn!("rospendulum token given but the ROS bridge is not implemented; continuing without it");
    }

    if let (Some(si), Some(li)) = (t.selector_index, t.learner_index) {
        if si < li {
            return Err(ConfigError::SelectorBeforeLearner);
        }
    } else if t.selector_index.is_some() {
        return Err(ConfigError::SelectorBeforeLearner);
    }

    let world_kind = t.world.ok_or(ConfigError::MissingWorld)?;
    let model_kind = t.model.ok_or(ConfigError::MissingModel)?;
    let learner_kind = t.learner.ok_or(ConfigError::MissingLearner)?;
    let selector_kind = t.selector.ok_or(ConfigError::MissingSelector)?;

    let is_tmaze = matches!(world_kind, WorldKind::TMaze);
    let mut agent_config = AgentConfig::default();
    let mut td_config = TdConfig::default();
    if is_tmaze {
        agent_config.num_episodes = 50_000;
        td_config.gamma = 0.98;
    }

    let mut world = build_world(world_kind, t.random_initial);
    if t.pomdp {
        world = Box::new(Scale::new(world, vec![1.0, 0.0]));
    }
    if t.oneofn {
        world = Box::new(OneHot::new(world, one_hot_ranges(world_kind, t.pomdp)));
    }

    let num_actions = world.num_actions();
    world.reset();
    let mut initial_state = Vec::new();
    world.initial_state(&mut initial_state);
    let state_size = initial_state.len();

    let value_size = selector_value_size(selector_kind, learner_kind, num_actions);
    let selector = build_selector(selector_kind, learner_kind, td_config);
    let mut model = build_model(model_kind, value_size, num_actions, state_size);

    if t.dyna {
        let world_model = Box::new(Table::new(state_size + 2));
        let rollout_selector = build_selector(selector_kind, learner_kind, td_config);
        model = Box::new(DynaModel::new(
            world_model,
            model,
            rollout_selector,
            initial_state,
            num_actions,
            None,
            DynaConfig::default(),
        ));
    }

    let mut agent = Agent::new(world, model, selector, None, agent_config);
    let rewards = agent.run();

    let mut file = File::create("rewards.dat")?;
    for (i, r) in rewards.iter().enumerate() {
        writeln!(file, "{i}\t{r}")?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    interrupt::install_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
