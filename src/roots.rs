//! Modular arithmetic and primitive roots of prime moduli.
//!
//! Every multiplication goes through `u128`, so all of these are exact for any
//! `u64` modulus.

const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Computes `(a * b) % m`. `m` must not be zero.
#[inline]
pub fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// Computes `base^exponent % modulus` by repeated squaring.
///
/// Returns 0 when `modulus == 1` and 1 when `exponent == 0`. `modulus` must not be zero.
pub fn mod_exp(base: u64, exponent: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }

    let mut result = 1;
    let mut base = base % modulus;
    let mut exponent = exponent;

    while exponent > 0 {
        if exponent & 1 != 0 {
            result = mod_mul(result, base, modulus);
        }

        base = mod_mul(base, base, modulus);
        exponent >>= 1;
    }

    result
}

/// Greatest common divisor of `a` and `b`.
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);

    while b != 0 {
        (a, b) = (b, a % b);
    }

    a
}

/// Deterministic Miller-Rabin, exact for every `u64`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }

    for &p in &WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for &a in &WITNESSES {
        let mut x = mod_exp(a, d, n);

        if x == 1 || x == n - 1 {
            continue;
        }

        for _ in 1..s {
            x = mod_mul(x, x, n);

            if x == n - 1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Distinct prime divisors of `n`, ascending, found by trial division over `primes`.
///
/// A cofactor left over once the candidates run out is reported as well. It is
/// prime as long as `primes` holds every prime up to `sqrt(n)`.
pub fn prime_factors(n: u64, primes: &[u64]) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut n = n;

    if n == 0 {
        return factors;
    }

    for &f in primes {
        if n == 1 || f.saturating_mul(f) > n {
            break;
        }

        if n % f == 0 {
            factors.push(f);

            while n % f == 0 {
                n /= f;
            }
        }
    }

    if n > 1 {
        factors.push(n);
    }

    factors
}

/// The smallest primitive root of the prime `t`.
///
/// `primes` must contain every prime up to `sqrt(t - 1)`.
pub fn primitive_root(t: u64, primes: &[u64]) -> Option<u64> {
    match t {
        0 | 1 => return None,
        2 => return Some(1),
        _ => {}
    }

    let s = t - 1;
    let powers: Vec<u64> = prime_factors(s, primes)
        .into_iter()
        .map(|factor| s / factor)
        .collect();

    (2..t).find(|&a| powers.iter().all(|&power| mod_exp(a, power, t) != 1))
}

/// Every primitive root of the prime `t`, ordered by exponent of the smallest one.
///
/// With `g` the smallest root, this is `g^k mod t` for each `k` in `1..t` coprime
/// to `t - 1`. Returns `None` when no candidate below `t` passes, which cannot
/// happen for a prime `t`.
pub fn primitive_roots(t: u64, primes: &[u64]) -> Option<Vec<u64>> {
    let generator = primitive_root(t, primes)?;

    if t == 2 {
        return Some(vec![generator]);
    }

    let s = t - 1;
    let roots = (1..t)
        .filter(|&k| gcd(s, k) == 1)
        .map(|k| mod_exp(generator, k, t))
        .collect();

    Some(roots)
}
