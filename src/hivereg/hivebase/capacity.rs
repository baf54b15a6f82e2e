// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Array Capacity Policy
//!
//! Child and value arrays share one sizing policy: the first insertion
//! reserves eight slots, a full array grows by 50%, and an array less than
//! half used shrinks by 33%, never below eight slots.

/// Minimum allocated slots per child or value array.
pub(crate) const MIN_CAPACITY: usize = 8;

/// Makes room for one more element ahead of an insertion.
pub(crate) fn reserve_slot<T>(array: &mut Vec<T>) {
    if array.capacity() == 0 {
        array.reserve_exact(MIN_CAPACITY);
    } else if array.len() == array.capacity() {
        let grown = array.capacity() + array.capacity() / 2;
        array.reserve_exact(grown - array.len());
    }
}

/// Gives memory back after a removal when the array is half empty.
pub(crate) fn shrink_slots<T>(array: &mut Vec<T>) {
    let cap = array.capacity();
    if cap > MIN_CAPACITY && array.len() < cap / 2 {
        let target = (cap - cap / 3).max(MIN_CAPACITY);
        array.shrink_to(target.max(array.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_reserves_minimum() {
        let mut v: Vec<u32> = Vec::new();
        reserve_slot(&mut v);
        v.push(1);
        assert!(v.capacity() >= MIN_CAPACITY);
    }

    #[test]
    fn test_capacity_never_below_used() {
        let mut v: Vec<u32> = Vec::new();
        for i in 0..100 {
            reserve_slot(&mut v);
            v.push(i);
            assert!(v.capacity() >= v.len());
        }
        while v.len() > 1 {
            v.pop();
            shrink_slots(&mut v);
            assert!(v.capacity() >= v.len());
            assert!(v.capacity() >= MIN_CAPACITY);
        }
    }
}
