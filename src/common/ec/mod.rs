mod block;
mod galois;

pub(crate) use block::*;
pub(crate) use galois::*;

const MAX_BLOCK_SIZE: usize = 256;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

// Builds the generator polynomial (x - a^0)(x - a^1)...(x - a^(n-1)) with
// coefficients ordered from the highest degree, so the result has n + 1 terms
// and a leading coefficient of 1
pub fn generator_polynomial(ecc_count: usize) -> Vec<G> {
    let mut poly = vec![G::ONE];
    for i in 0..ecc_count {
        let root = G::gen_pow(i);
        let mut next = vec![G::ZERO; poly.len() + 1];
        for (j, &coeff) in poly.iter().enumerate() {
            next[j] += coeff;
            next[j + 1] += coeff * root;
        }
        poly = next;
    }
    poly
}

// Performs polynomial long division of the data polynomial by the generator
// polynomial. The remainder register shifts once per data codeword; slot j is
// always paired with generator coefficient j + 1, i.e. degree n - 1 - j.
pub fn ecc(data: &[u8], gen_poly: &[G]) -> Vec<u8> {
    let ecc_count = gen_poly.len() - 1;
    debug_assert!(ecc_count > 0, "Generator polynomial must have a degree of at least 1");

    let mut rem = vec![G::ZERO; ecc_count];
    for &b in data {
        let factor = G(b) + rem[0];
        rem.rotate_left(1);
        rem[ecc_count - 1] = G::ZERO;
        for (r, &g) in rem.iter_mut().zip(gen_poly[1..].iter()) {
            *r += g * factor;
        }
    }
    rem.into_iter().map(u8::from).collect()
}
