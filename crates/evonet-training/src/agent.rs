//! The per-tick contract between a simulation and a network.

use evonet_engine::{Brain, NetworkError};

/// Something in a simulated world that a network controls.
pub trait Agent {
    /// Writes the current observation into `inputs`.
    ///
    /// `inputs` is zero-filled and exactly as long as the controlling brain's
    /// input count.
    fn observe(&self, inputs: &mut [f64]);

    /// Performs the chosen action. `None` means no output was positive and the
    /// agent should do nothing this tick.
    fn act(&mut self, action: Option<usize>);
}

/// Runs one decision tick: observe, evaluate, act.
///
/// `inputs` is scratch space reused across ticks. Returns the action that was
/// delivered to the agent.
pub fn run_tick<B, A>(
    brain: &B,
    agent: &mut A,
    inputs: &mut Vec<f64>,
) -> Result<Option<usize>, NetworkError>
where
    B: Brain,
    A: Agent + ?Sized,
{
    inputs.clear();
    inputs.resize(brain.input_count(), 0.0);
    agent.observe(inputs);
    let action = brain.action(inputs)?;
    agent.act(action);
    Ok(action)
}

#[cfg(test)]
mod tests {
    use evonet_engine::{Activation, Layer, Network, Node};

    use super::*;

    /// Reports a fixed observation and records what it was told to do.
    struct Recorder {
        observation: Vec<f64>,
        actions: Vec<Option<usize>>,
    }

    impl Agent for Recorder {
        fn observe(&self, inputs: &mut [f64]) {
            inputs.copy_from_slice(&self.observation);
        }

        fn act(&mut self, action: Option<usize>) {
            self.actions.push(action);
        }
    }

    /// Output `i` is `inputs[i]`, so the action is the largest positive input.
    fn passthrough(width: usize) -> Network {
        let nodes = (0..width)
            .map(|i| {
                let mut weights = vec![0.0; width];
                weights[i] = 1.0;
                Node::with_values(weights, 0.0)
            })
            .collect();
        let mut network = Network::new(width, width, 0)
            .unwrap()
            .with_activation(Activation::Identity);
        network
            .copy_from(&[Layer::from_nodes(width, nodes).unwrap()])
            .unwrap();
        network
    }

    #[test]
    fn test_tick_delivers_best_action() {
        let brain = passthrough(3);
        let mut agent = Recorder {
            observation: vec![0.5, 2.0, -1.0],
            actions: vec![],
        };
        let mut inputs = vec![9.0; 10];
        assert_eq!(run_tick(&brain, &mut agent, &mut inputs).unwrap(), Some(1));
        assert_eq!(inputs.len(), 3);

        agent.observation = vec![-1.0, -2.0, 0.0];
        assert_eq!(run_tick(&brain, &mut agent, &mut inputs).unwrap(), None);
        assert_eq!(agent.actions, vec![Some(1), None]);
    }
}
