use tracing::trace;

/// Returns every prime up to and including the first prime strictly greater than `n`.
///
/// Candidates are tested by trial division against the primes found so far (only
/// those up to the square root matter), so the result is always ascending and its
/// last element is a usable modulus for a range of width `n`. Returns an empty
/// vector when `n < 2`.
pub fn primes_past(n: u64) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::new();

    if n < 2 {
        return primes;
    }

    let mut candidate = 2u64;

    loop {
        let is_prime = primes
            .iter()
            .take_while(|&&p| p.saturating_mul(p) <= candidate)
            .all(|&p| candidate % p != 0);

        if is_prime {
            primes.push(candidate);

            if candidate > n {
                break;
            }
        }

        // 2, 3, 5, 7, ...
        candidate += 1 + (candidate & 1);
    }

    trace!(bound = n, found = primes.len(), "sieved primes");
    primes
}

/// Integer square root, rounded down.
pub(crate) fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }

    let mut x = (n as f64).sqrt() as u64;

    while x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }

    while (x + 1).checked_mul(x + 1).map_or(false, |sq| sq <= n) {
        x += 1;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::{isqrt, primes_past};

    #[test]
    fn below_two_is_empty() {
        assert!(primes_past(0).is_empty());
        assert!(primes_past(1).is_empty());
    }

    #[test]
    fn stops_after_first_prime_past_bound() {
        assert_eq!(primes_past(2), vec![2, 3]);
        assert_eq!(primes_past(3), vec![2, 3, 5]);
        assert_eq!(primes_past(4), vec![2, 3, 5]);
        assert_eq!(primes_past(10), vec![2, 3, 5, 7, 11]);
        assert_eq!(primes_past(13), vec![2, 3, 5, 7, 11, 13, 17]);
    }

    #[test]
    fn last_prime_exceeds_bound() {
        for n in 2..500 {
            let primes = primes_past(n);
            let last = *primes.last().unwrap();
            assert!(last > n);
            assert!(primes[..primes.len() - 1].iter().all(|&p| p <= n));
        }
    }

    #[test]
    fn count_matches_known_pi() {
        // pi(1000) = 168, plus 1009 past the bound.
        let primes = primes_past(1000);
        assert_eq!(primes.len(), 169);
        assert_eq!(primes.last(), Some(&1009));
    }

    #[test]
    fn integer_sqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(15), 3);
        assert_eq!(isqrt(16), 4);
        assert_eq!(isqrt(u64::MAX), u32::MAX as u64);
        assert_eq!(isqrt((1 << 62) - 1), (1 << 31) - 1);
    }
}
