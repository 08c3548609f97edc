use super::VariableId;
use crate::basic_types::EmptyDomain;
use crate::engine::events::DomainEvent;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::quince_assert_advanced;

/// The domain of an integer variable.
///
/// The bounds and the size are reversible cells. An enumerated domain additionally keeps the
/// present values in a trailed bitset and can therefore represent holes; a bounded domain cannot,
/// and ignores the removal of values strictly between its bounds.
///
/// Every operation either leaves the domain unchanged (`Ok(None)`), shrinks it and reports the
/// strongest event that describes the change, or fails without touching the domain.
#[derive(Debug, Clone)]
pub(crate) struct IntegerDomain {
    id: VariableId,
    lower_bound: TrailedInteger,
    upper_bound: TrailedInteger,
    size: TrailedInteger,
    values: Option<TrailedBitSet>,
}

impl IntegerDomain {
    pub(crate) fn new(
        id: VariableId,
        trailed_values: &mut TrailedValues,
        lower_bound: i32,
        upper_bound: i32,
        enumerated: bool,
    ) -> IntegerDomain {
        let size = (upper_bound as i64) - (lower_bound as i64) + 1;
        let values = enumerated.then(|| {
            TrailedBitSet::new(
                trailed_values,
                lower_bound,
                size as u32,
                lower_bound..=upper_bound,
            )
        });

        IntegerDomain {
            id,
            lower_bound: trailed_values.grow(lower_bound as i64),
            upper_bound: trailed_values.grow(upper_bound as i64),
            size: trailed_values.grow(size),
            values,
        }
    }

    pub(crate) fn lower_bound(&self, trailed_values: &TrailedValues) -> i32 {
        trailed_values.read(self.lower_bound) as i32
    }

    pub(crate) fn upper_bound(&self, trailed_values: &TrailedValues) -> i32 {
        trailed_values.read(self.upper_bound) as i32
    }

    pub(crate) fn size(&self, trailed_values: &TrailedValues) -> u64 {
        trailed_values.read(self.size) as u64
    }

    pub(crate) fn is_fixed(&self, trailed_values: &TrailedValues) -> bool {
        self.lower_bound(trailed_values) == self.upper_bound(trailed_values)
    }

    pub(crate) fn contains(&self, trailed_values: &TrailedValues, value: i32) -> bool {
        self.lower_bound(trailed_values) <= value
            && value <= self.upper_bound(trailed_values)
            && self
                .values
                .as_ref()
                .map_or(true, |values| values.contains(trailed_values, value))
    }

    pub(crate) fn iter<'a>(
        &'a self,
        trailed_values: &'a TrailedValues,
    ) -> impl Iterator<Item = i32> + 'a {
        (self.lower_bound(trailed_values)..=self.upper_bound(trailed_values))
            .filter(move |&value| self.contains(trailed_values, value))
    }

    pub(crate) fn update_lower_bound(
        &self,
        trailed_values: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<DomainEvent>, EmptyDomain> {
        let lower_bound = self.lower_bound(trailed_values);
        let upper_bound = self.upper_bound(trailed_values);
        if value <= lower_bound {
            return Ok(None);
        }
        if value > upper_bound {
            return Err(EmptyDomain(self.id));
        }

        let (new_lower_bound, num_removed) = match &self.values {
            Some(values) => {
                let new_lower_bound = values
                    .next_member(trailed_values, value, upper_bound)
                    .ok_or(EmptyDomain(self.id))?;
                let num_removed =
                    values.count_members(trailed_values, lower_bound, new_lower_bound - 1);
                (new_lower_bound, num_removed as i64)
            }
            None => (value, (value as i64) - (lower_bound as i64)),
        };

        trailed_values.assign(self.lower_bound, new_lower_bound as i64);
        trailed_values.add_assign(self.size, -num_removed);
        self.debug_check(trailed_values);

        Ok(Some(self.bound_event(trailed_values, DomainEvent::LowerBound)))
    }

    pub(crate) fn update_upper_bound(
        &self,
        trailed_values: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<DomainEvent>, EmptyDomain> {
        let lower_bound = self.lower_bound(trailed_values);
        let upper_bound = self.upper_bound(trailed_values);
        if value >= upper_bound {
            return Ok(None);
        }
        if value < lower_bound {
            return Err(EmptyDomain(self.id));
        }

        let (new_upper_bound, num_removed) = match &self.values {
            Some(values) => {
                let new_upper_bound = values
                    .previous_member(trailed_values, lower_bound, value)
                    .ok_or(EmptyDomain(self.id))?;
                let num_removed =
                    values.count_members(trailed_values, new_upper_bound + 1, upper_bound);
                (new_upper_bound, num_removed as i64)
            }
            None => (value, (upper_bound as i64) - (value as i64)),
        };

        trailed_values.assign(self.upper_bound, new_upper_bound as i64);
        trailed_values.add_assign(self.size, -num_removed);
        self.debug_check(trailed_values);

        Ok(Some(self.bound_event(trailed_values, DomainEvent::UpperBound)))
    }

    pub(crate) fn remove_value(
        &self,
        trailed_values: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<DomainEvent>, EmptyDomain> {
        if !self.contains(trailed_values, value) {
            return Ok(None);
        }
        if self.is_fixed(trailed_values) {
            return Err(EmptyDomain(self.id));
        }

        if value == self.lower_bound(trailed_values) {
            return self.update_lower_bound(trailed_values, value + 1);
        }
        if value == self.upper_bound(trailed_values) {
            return self.update_upper_bound(trailed_values, value - 1);
        }

        let Some(values) = &self.values else {
            return Ok(None);
        };
        let _ = values.remove(trailed_values, value);
        trailed_values.add_assign(self.size, -1);
        self.debug_check(trailed_values);

        Ok(Some(DomainEvent::Removal))
    }

    pub(crate) fn instantiate(
        &self,
        trailed_values: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<DomainEvent>, EmptyDomain> {
        if !self.contains(trailed_values, value) {
            return Err(EmptyDomain(self.id));
        }
        if self.is_fixed(trailed_values) {
            return Ok(None);
        }

        trailed_values.assign(self.lower_bound, value as i64);
        trailed_values.assign(self.upper_bound, value as i64);
        trailed_values.assign(self.size, 1);

        Ok(Some(DomainEvent::Instantiate))
    }

    fn bound_event(&self, trailed_values: &TrailedValues, event: DomainEvent) -> DomainEvent {
        if self.is_fixed(trailed_values) {
            DomainEvent::Instantiate
        } else {
            event
        }
    }

    fn debug_check(&self, trailed_values: &TrailedValues) {
        quince_assert_advanced!(
            self.lower_bound(trailed_values) <= self.upper_bound(trailed_values),
            "the bounds of {} crossed",
            self.id
        );
        quince_assert_advanced!(
            self.size(trailed_values) == self.count_values(trailed_values),
            "the size counter of {} is out of sync",
            self.id
        );
    }

    fn count_values(&self, trailed_values: &TrailedValues) -> u64 {
        match self.values {
            Some(_) => self.iter(trailed_values).count() as u64,
            None => {
                let lower_bound = i64::from(self.lower_bound(trailed_values));
                let upper_bound = i64::from(self.upper_bound(trailed_values));
                (upper_bound - lower_bound + 1) as u64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    fn domain(
        trailed_values: &mut TrailedValues,
        lower_bound: i32,
        upper_bound: i32,
        enumerated: bool,
    ) -> IntegerDomain {
        IntegerDomain::new(
            VariableId::create_from_index(0),
            trailed_values,
            lower_bound,
            upper_bound,
            enumerated,
        )
    }

    #[test]
    fn tightening_skips_holes() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, 0, 9, true);

        assert_eq!(
            Ok(Some(DomainEvent::Removal)),
            domain.remove_value(&mut trailed_values, 3)
        );
        assert_eq!(
            Ok(Some(DomainEvent::LowerBound)),
            domain.update_lower_bound(&mut trailed_values, 3)
        );

        assert_eq!(4, domain.lower_bound(&trailed_values));
        assert_eq!(6, domain.size(&trailed_values));
    }

    #[test]
    fn operations_that_do_not_shrink_are_no_ops() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, 2, 5, true);

        assert_eq!(Ok(None), domain.update_lower_bound(&mut trailed_values, 1));
        assert_eq!(Ok(None), domain.update_upper_bound(&mut trailed_values, 5));
        assert_eq!(Ok(None), domain.remove_value(&mut trailed_values, 7));
        assert_eq!(4, domain.size(&trailed_values));
    }

    #[test]
    fn emptying_the_domain_fails_without_changes() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, 2, 5, true);

        assert!(domain.update_lower_bound(&mut trailed_values, 6).is_err());
        assert!(domain.update_upper_bound(&mut trailed_values, 1).is_err());
        assert!(domain.instantiate(&mut trailed_values, 9).is_err());

        assert_eq!(2, domain.lower_bound(&trailed_values));
        assert_eq!(5, domain.upper_bound(&trailed_values));
    }

    #[test]
    fn removing_last_value_fails() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, 4, 4, false);

        assert!(domain.remove_value(&mut trailed_values, 4).is_err());
        assert!(domain.is_fixed(&trailed_values));
    }

    #[test]
    fn bounded_domain_ignores_interior_removal() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, 0, 10, false);

        assert_eq!(Ok(None), domain.remove_value(&mut trailed_values, 5));
        assert!(domain.contains(&trailed_values, 5));
        assert_eq!(
            Ok(Some(DomainEvent::UpperBound)),
            domain.remove_value(&mut trailed_values, 10)
        );
        assert_eq!(10, domain.size(&trailed_values));
    }

    #[test]
    fn tightening_to_single_value_reports_instantiation() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, 0, 3, false);

        assert_eq!(
            Ok(Some(DomainEvent::Instantiate)),
            domain.update_upper_bound(&mut trailed_values, 0)
        );
        assert!(domain.is_fixed(&trailed_values));
    }

    #[test]
    fn bounds_never_cross_under_mixed_operations() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, -5, 12, true);

        let operations: [(u8, i32); 10] = [
            (0, -3),
            (2, 0),
            (1, 9),
            (2, 9),
            (0, 1),
            (2, 8),
            (1, 4),
            (3, 3),
            (0, 7),
            (1, -10),
        ];
        for (kind, value) in operations {
            let result = match kind {
                0 => domain.update_lower_bound(&mut trailed_values, value),
                1 => domain.update_upper_bound(&mut trailed_values, value),
                2 => domain.remove_value(&mut trailed_values, value),
                _ => domain.instantiate(&mut trailed_values, value),
            };
            if result.is_ok() {
                assert!(domain.lower_bound(&trailed_values) <= domain.upper_bound(&trailed_values));
            }
        }
    }

    #[test]
    fn backtracking_restores_holes() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, 0, 4, true);

        trailed_values.new_checkpoint();
        let _ = domain.remove_value(&mut trailed_values, 2);
        let _ = domain.update_upper_bound(&mut trailed_values, 3);
        assert_eq!(vec![0, 1, 3], domain.iter(&trailed_values).collect::<Vec<_>>());

        trailed_values.synchronise(0);
        assert_eq!(vec![0, 1, 2, 3, 4], domain.iter(&trailed_values).collect::<Vec<_>>());
        assert_eq!(5, domain.size(&trailed_values));
    }

    #[test]
    fn size_of_the_full_range_does_not_wrap() {
        let mut trailed_values = TrailedValues::default();
        let domain = domain(&mut trailed_values, i32::MIN, i32::MAX, false);

        assert_eq!(1 << 32, domain.size(&trailed_values));

        assert_eq!(
            Ok(Some(DomainEvent::LowerBound)),
            domain.update_lower_bound(&mut trailed_values, 0)
        );
        assert_eq!(1 << 31, domain.size(&trailed_values));
    }
}
