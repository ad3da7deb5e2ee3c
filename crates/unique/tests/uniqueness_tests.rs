//! Uniqueness guarantees of the integer generators over large draws

use std::collections::HashSet;

use fixtura_unique::{
    I16Creator, I32Creator, I64Creator, I8Creator, U16Creator, U32Creator, U8Creator,
    UniqueCreator,
};

fn draw<T, C>(creator: &mut C, count: usize) -> HashSet<T>
where
    T: std::hash::Hash + Eq,
    C: UniqueCreator<T>,
{
    (0..count).map(|_| creator.next_value()).collect()
}

#[test]
fn test_i32_million_values_are_distinct() {
    let values = draw(&mut I32Creator::new(), 1_000_000);
    assert_eq!(values.len(), 1_000_000);
}

#[test]
fn test_u32_million_values_are_distinct() {
    let values = draw(&mut U32Creator::new(), 1_000_000);
    assert_eq!(values.len(), 1_000_000);
}

#[test]
fn test_i64_values_are_distinct() {
    let values = draw(&mut I64Creator::new(), 200_000);
    assert_eq!(values.len(), 200_000);
}

#[test]
fn test_u8_exhausts_all_values_but_zero() {
    let values = draw(&mut U8Creator::new(), 255);
    assert_eq!(values.len(), 255);
    assert!(!values.contains(&0));
}

#[test]
fn test_i8_exhausts_all_values_but_zero() {
    let values = draw(&mut I8Creator::new(), 255);
    assert_eq!(values.len(), 255);
    assert!(!values.contains(&0));
}

#[test]
fn test_16_bit_generators_cover_the_full_range() {
    assert_eq!(draw(&mut U16Creator::new(), 65_535).len(), 65_535);
    assert_eq!(draw(&mut I16Creator::new(), 65_535).len(), 65_535);
}

#[test]
fn test_generators_wrap_after_exhaustion() {
    let mut creator = U8Creator::new();
    let first: Vec<u8> = (0..255).map(|_| creator.next_value()).collect();
    assert_eq!(creator.next_value(), 0);
    let second: Vec<u8> = (0..255).map(|_| creator.next_value()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_early_values_are_spread_across_the_range() {
    let mut creator = I32Creator::new();
    let first: Vec<i32> = (0..16).map(|_| creator.next_value()).collect();
    assert!(first.iter().any(|v| *v >= 1 << 24 || *v < 0));
}
