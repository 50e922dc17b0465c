use lock_api::GuardSend;
use parking_lot_core::{ParkToken, SpinWait, UnparkResult, UnparkToken};
use std::sync::atomic::{AtomicU8, Ordering};

const LOCKED_BIT: u8 = 0b01;
const PARKED_BIT: u8 = 0b10;

pub type Mutex<T> = lock_api::Mutex<RawMutex, T>;

/// A word-sized mutex that spins briefly and then parks.
pub struct RawMutex {
    state: AtomicU8,
}

unsafe impl lock_api::RawMutex for RawMutex {
    type GuardMarker = GuardSend;

    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawMutex {
        state: AtomicU8::new(0),
    };

    fn lock(&self) {
        if self
            .state
            .compare_exchange_weak(0, LOCKED_BIT, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            self.lock_slow();
        }
    }

    fn try_lock(&self) -> bool {
        let mut state = self.state.load(Ordering::Relaxed);

        loop {
            if state & LOCKED_BIT != 0 {
                return false;
            }

            match self.state.compare_exchange_weak(
                state,
                state | LOCKED_BIT,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(x) => state = x,
            }
        }
    }

    unsafe fn unlock(&self) {
        if self
            .state
            .compare_exchange(LOCKED_BIT, 0, Ordering::Release, Ordering::Relaxed)
            .is_ok()
        {
            return;
        }

        self.unlock_slow();
    }

    fn is_locked(&self) -> bool {
        self.state.load(Ordering::Relaxed) & LOCKED_BIT != 0
    }
}

impl RawMutex {
    #[cold]
    fn lock_slow(&self) {
        let mut spin = SpinWait::new();
        let mut state = self.state.load(Ordering::Relaxed);

        loop {
            if state & LOCKED_BIT == 0 {
                match self.state.compare_exchange_weak(
                    state,
                    state | LOCKED_BIT,
                    Ordering::Acquire,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return,
                    Err(x) => state = x,
                }
                continue;
            }

            if state & PARKED_BIT == 0 && spin.spin() {
                state = self.state.load(Ordering::Relaxed);
                continue;
            }

            if state & PARKED_BIT == 0 {
                if let Err(x) = self.state.compare_exchange_weak(
                    state,
                    state | PARKED_BIT,
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    state = x;
                    continue;
                }
            }

            let key = self as *const _ as usize;
            let validate = || self.state.load(Ordering::Relaxed) == LOCKED_BIT | PARKED_BIT;

            // SAFETY: the key is this lock's address and stays valid while we are
            // parked on it. None of the callbacks panic or call back into
            // `parking_lot_core`.
            unsafe {
                parking_lot_core::park(
                    key,
                    validate,
                    || {},
                    |_, _| {},
                    ParkToken(0),
                    None,
                );
            }

            spin.reset();
            state = self.state.load(Ordering::Relaxed);
        }
    }

    #[cold]
    fn unlock_slow(&self) {
        let key = self as *const _ as usize;
        let callback = |result: UnparkResult| {
            // Keep the parked bit while anyone is still queued on the key.
            if result.have_more_threads {
                self.state.store(PARKED_BIT, Ordering::Release);
            } else {
                self.state.store(0, Ordering::Release);
            }

            UnparkToken(0)
        };

        // SAFETY: same key as `lock_slow`, and the callback only touches our state.
        unsafe {
            parking_lot_core::unpark_one(key, callback);
        }
    }
}
