// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nafuda::IdAllocator;
use nafuda_domain::IdCounter;

use crate::Persistence;

#[test]
fn test_unused_counter_starts_at_one() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert_eq!(
        persistence.current_counter_value(IdCounter::Payment).unwrap(),
        None
    );
    assert_eq!(persistence.next_id(IdCounter::Payment).unwrap(), 1);
    assert_eq!(
        persistence.current_counter_value(IdCounter::Payment).unwrap(),
        Some(1)
    );
}

#[test]
fn test_counter_values_are_strictly_increasing() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let values: Vec<i64> = (0..5)
        .map(|_| persistence.next_id(IdCounter::Event).unwrap())
        .collect();

    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_counters_are_independent() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    persistence.next_id(IdCounter::Payment).unwrap();
    persistence.next_id(IdCounter::Payment).unwrap();

    assert_eq!(persistence.next_id(IdCounter::Member).unwrap(), 1);
    assert_eq!(persistence.next_id(IdCounter::Payment).unwrap(), 3);
}
