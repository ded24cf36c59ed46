//! Mutable coin collections attached to cells.

use geocoin_core::{CacheSnapshot, Coin, CollectError, DepositError, GridCell};

/// Live cache instantiated from the store for the duration of a mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Cache {
    cell: GridCell,
    coins: Vec<Coin>,
    next_serial: u32,
}

impl Cache {
    /// Creates a cache in `cell` holding `count` freshly minted coins.
    pub(crate) fn spawn(cell: GridCell, count: u32) -> Self {
        Self {
            cell,
            coins: (0..count).map(|serial| Coin::new(cell, serial)).collect(),
            next_serial: count,
        }
    }

    /// Re-instantiates a cache from its stored snapshot.
    pub(crate) fn from_snapshot(cell: GridCell, snapshot: &CacheSnapshot) -> Self {
        Self {
            cell,
            coins: snapshot.coins().to_vec(),
            next_serial: snapshot.next_serial(),
        }
    }

    /// Captures the cache so it can be written back into the store.
    pub(crate) fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot::from_parts(self.coins.clone(), self.next_serial)
    }

    pub(crate) fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub(crate) fn coin_count(&self) -> u32 {
        u32::try_from(self.coins.len()).unwrap_or(u32::MAX)
    }

    /// Removes every coin, returning how many were taken.
    pub(crate) fn collect_all(&mut self) -> Result<u32, CollectError> {
        if self.coins.is_empty() {
            return Err(CollectError::CacheEmpty);
        }
        let count = self.coin_count();
        self.coins.clear();
        Ok(count)
    }

    /// Mints `amount` coins with the cache's next serials.
    ///
    /// Leaves the cache untouched when the serial counter would overflow.
    pub(crate) fn deposit(&mut self, amount: u32) -> Result<(), DepositError> {
        let next_serial = self
            .next_serial
            .checked_add(amount)
            .ok_or(DepositError::CacheFull)?;
        let cell = self.cell;
        self.coins
            .extend((self.next_serial..next_serial).map(|serial| Coin::new(cell, serial)));
        self.next_serial = next_serial;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_mints_sequential_serials() {
        let cell = GridCell::new(2, 3);
        let cache = Cache::spawn(cell, 4);
        let serials: Vec<u32> = cache.coins().iter().map(Coin::serial).collect();
        assert_eq!(serials, vec![0, 1, 2, 3]);
        assert!(cache.coins().iter().all(|coin| coin.cell() == cell));
        assert_eq!(cache.snapshot().next_serial(), 4);
    }

    #[test]
    fn collect_all_empties_then_rejects() {
        let mut cache = Cache::spawn(GridCell::new(0, 0), 5);
        assert_eq!(cache.collect_all(), Ok(5));
        assert_eq!(cache.coin_count(), 0);
        assert_eq!(cache.collect_all(), Err(CollectError::CacheEmpty));
    }

    #[test]
    fn deposit_continues_serials_after_collection() {
        let cell = GridCell::new(-1, 1);
        let mut cache = Cache::spawn(cell, 2);
        let _ = cache.collect_all();
        cache.deposit(3).expect("deposit fits");
        let coins: Vec<String> = cache.coins().iter().map(ToString::to_string).collect();
        assert_eq!(coins, vec!["-1:1#2", "-1:1#3", "-1:1#4"]);
    }

    #[test]
    fn deposit_rejects_serial_overflow_without_change() {
        let cell = GridCell::new(0, 0);
        let full = CacheSnapshot::from_parts(Vec::new(), u32::MAX);
        let mut cache = Cache::from_snapshot(cell, &full);
        assert_eq!(cache.deposit(1), Err(DepositError::CacheFull));
        assert_eq!(cache.coin_count(), 0);
        assert_eq!(cache.snapshot().next_serial(), u32::MAX);
    }
}
