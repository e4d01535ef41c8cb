//! Behavioural coverage for sample inventory generation.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use rstest::rstest;
use sample_data::{
    DEFAULT_MAX_CAPACITY, DEFAULT_THRESHOLD, InventoryShape, MIN_CURRENT_LEVEL,
    generate_sample_inventory,
};

#[rstest]
fn default_shape_builds_five_by_three_by_three() {
    let inventory = generate_sample_inventory(2024, InventoryShape::default()).expect("generated");

    assert_eq!(inventory.floors.len(), 5);
    assert_eq!(inventory.pantry_count(), 15);
    assert_eq!(inventory.dispenser_count(), 45);
    let numbers: Vec<u32> = inventory.floors.iter().map(|floor| floor.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
}

#[rstest]
#[case(0)]
#[case(7)]
#[case(u64::MAX)]
fn generated_dispensers_respect_bounds(#[case] seed: u64) {
    let inventory = generate_sample_inventory(seed, InventoryShape::default()).expect("generated");

    for dispenser in inventory
        .floors
        .iter()
        .flat_map(|floor| &floor.pantries)
        .flat_map(|pantry| &pantry.dispensers)
    {
        assert_eq!(dispenser.max_capacity, DEFAULT_MAX_CAPACITY);
        assert_eq!(dispenser.threshold, DEFAULT_THRESHOLD);
        assert!((MIN_CURRENT_LEVEL..=DEFAULT_MAX_CAPACITY).contains(&dispenser.current_level));
    }
}

#[rstest]
fn pantry_names_identify_their_floor() {
    let inventory = generate_sample_inventory(1, InventoryShape::default()).expect("generated");

    for floor in &inventory.floors {
        for (index, pantry) in floor.pantries.iter().enumerate() {
            assert_eq!(
                pantry.name,
                format!("Pantry {} on Floor {}", index + 1, floor.number)
            );
        }
    }
}

#[rstest]
fn same_seed_is_reproducible_and_seeds_differ() {
    let shape = InventoryShape::default();
    let first = generate_sample_inventory(99, shape).expect("generated");
    let again = generate_sample_inventory(99, shape).expect("generated");
    let other = generate_sample_inventory(100, shape).expect("generated");

    assert_eq!(first, again);
    assert_ne!(first, other);
}

#[rstest]
fn sample_user_matches_documented_credentials() {
    let inventory = generate_sample_inventory(5, InventoryShape::default()).expect("generated");

    assert_eq!(inventory.user.username, "sampleuser");
    assert_eq!(inventory.user.email, "sampleuser@example.com");
    assert_eq!(inventory.user.password, "password123");
}

#[rstest]
fn kinds_serialise_as_two_letter_codes() {
    let inventory = generate_sample_inventory(3, InventoryShape::default()).expect("generated");
    let json = serde_json::to_value(&inventory).expect("serialise");
    let kind = &json["floors"][0]["pantries"][0]["dispensers"][0]["kind"];

    assert!(matches!(kind.as_str(), Some("DR" | "SN" | "CO")));
}
