use std::collections::VecDeque;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{DedupQueue, DedupQueueError, tests::init_logger};

/// Reference behaviour: a plain deque searched linearly
#[derive(Default)]
struct Model {
    items: VecDeque<u8>,
}

impl Model {
    fn position(&self, value: u8) -> Option<usize> {
        self.items.iter().position(|&item| item == value)
    }

    fn enqueue(&mut self, value: u8) -> bool {
        if let Some(index) = self.position(value) {
            self.items.remove(index);
        }
        self.items.push_back(value);
        true
    }

    fn enqueue_keep_existing(&mut self, value: u8) -> bool {
        if self.position(value).is_some() {
            return false;
        }
        self.items.push_back(value);
        true
    }

    fn remove(&mut self, value: u8) -> Option<u8> {
        let index = self.position(value)?;
        self.items.remove(index)
    }
}

fn run_sequence(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut queue = DedupQueue::new();
    let mut model = Model::default();

    for step in 0..steps {
        // A small key space keeps duplicates frequent
        let value: u8 = rng.random_range(0..16);
        match rng.random_range(0..7) {
            0 | 1 => assert_eq!(queue.enqueue(value), model.enqueue(value), "enqueue, step {step}"),
            2 | 3 => assert_eq!(
                queue.enqueue_keep_existing(value),
                model.enqueue_keep_existing(value),
                "enqueue_keep_existing, step {step}"
            ),
            4 => assert_eq!(queue.try_dequeue(), model.items.pop_front(), "try_dequeue, step {step}"),
            5 => assert_eq!(
                queue.dequeue().ok(),
                model.items.pop_front(),
                "dequeue, step {step}"
            ),
            _ => assert_eq!(queue.remove(&value), model.remove(value), "remove, step {step}"),
        }

        queue.check_invariants();
        assert_eq!(queue.len(), model.items.len(), "Size mismatch at step {step}");
        assert_eq!(queue.peek(), model.items.front(), "Head mismatch at step {step}");
        for probe in 0..16u8 {
            assert_eq!(
                queue.contains(&probe),
                model.position(probe).is_some(),
                "Membership of {probe} mismatch at step {step}"
            );
        }
    }

    // Size must equal what a full drain yields
    let expected = queue.len();
    let mut drained = vec![];
    while let Some(value) = queue.try_dequeue() {
        drained.push(value);
    }
    assert_eq!(drained.len(), expected);
    assert_eq!(drained, Vec::from(model.items));
    assert_eq!(queue.dequeue(), Err(DedupQueueError::EmptyCollection));
}

#[test]
fn test_matches_model() {
    init_logger();
    for seed in 0..32 {
        run_sequence(seed, 500);
    }
}

#[test]
fn test_matches_model_random_seed() {
    let seed = rand::rng().random();
    run_sequence(seed, 2000);
}

#[test]
fn test_untouched_elements_keep_fifo_order() {
    let mut rng = rand::rng();
    let mut queue = DedupQueue::new();

    // Distinct keys only: no displacement can happen
    let values: Vec<u32> = (0..256).collect();
    for &value in &values {
        if rng.random_bool(0.5) {
            queue.enqueue(value);
        } else {
            queue.enqueue_keep_existing(value);
        }
    }
    queue.check_invariants();

    let mut drained = vec![];
    while let Some(value) = queue.try_dequeue() {
        drained.push(value);
    }
    assert_eq!(drained, values);
}
