//! Flagship end-to-end guarantee: a grid world paired with a table value
//! model, Q-learning, and epsilon-greedy selection should actually learn a
//! workable policy over a realistic training run, not merely run without
//! panicking.

use episodic_rl::agent::{Agent, AgentConfig};
use episodic_rl::decay::Exponential;
use episodic_rl::learning::QLearning;
use episodic_rl::model::Table;
use episodic_rl::selector::EpsilonGreedy;
use episodic_rl::world::GridWorld;

#[test]
fn mean_reward_over_the_last_hundred_episodes_is_nonnegative() {
    let world = Box::new(GridWorld::standard());
    let model = Box::new(Table::new(4));
    let selector = Box::new(EpsilonGreedy::new(
        QLearning::default(),
        Exponential::new(1e-3, 1.0, 0.05).unwrap(),
    ));
    let config = AgentConfig::default(); // max_steps=200, batch_size=10, num_episodes=1000

    let mut agent = Agent::new(world, model, selector, None, config);
    let rewards = agent.run();

    assert_eq!(rewards.len(), 1000);
    let tail = &rewards[rewards.len() - 100..];
    let mean: f32 = tail.iter().sum::<f32>() / tail.len() as f32;
    assert!(
        mean >= 0.0,
        "expected the policy to have learned a net-positive route to the goal by episode 1000, got mean {mean}"
    );
}
