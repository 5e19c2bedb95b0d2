use crate::core::rng::Rng;

use super::PixelSamplerT;

/// Jittered grid whose cells cover the pixel exactly once: `spp` is split
/// into the most square `division_x * division_y` factorization.
#[derive(Clone, Copy)]
pub struct StratifiedSampler {
    division_x: u32,
    division_y: u32,
    division_x_inv: f32,
    division_y_inv: f32,
    curr_ind_x: u32,
    curr_ind_y: u32,
}

impl StratifiedSampler {
    pub fn new(spp: u32) -> Self {
        let (division_x, division_y) = square_factors(spp);
        Self {
            division_x,
            division_y,
            division_x_inv: 1.0 / division_x as f32,
            division_y_inv: 1.0 / division_y as f32,
            curr_ind_x: 0,
            curr_ind_y: 0,
        }
    }

    pub fn divisions(&self) -> (u32, u32) {
        (self.division_x, self.division_y)
    }
}

fn square_factors(n: u32) -> (u32, u32) {
    let n = n.max(1);
    let mut x = (n as f64).sqrt() as u32;
    while n % x != 0 {
        x -= 1;
    }
    (x, n / x)
}

impl PixelSamplerT for StratifiedSampler {
    fn spp(&self) -> u32 {
        self.division_x * self.division_y
    }

    fn start_pixel(&mut self) {
        self.curr_ind_x = 0;
        self.curr_ind_y = 0;
    }

    fn next_sample(&mut self, rng: &mut Rng) -> Option<(f32, f32)> {
        if self.curr_ind_y == self.division_y {
            None
        } else {
            let rand_x = (self.curr_ind_x as f32 + rng.uniform_1d()) * self.division_x_inv;
            let rand_y = (self.curr_ind_y as f32 + rng.uniform_1d()) * self.division_y_inv;
            self.curr_ind_x += 1;
            if self.curr_ind_x == self.division_x {
                self.curr_ind_x = 0;
                self.curr_ind_y += 1;
            }
            Some((rand_x, rand_y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorizes_sample_counts() {
        assert_eq!(StratifiedSampler::new(128).divisions(), (8, 16));
        assert_eq!(StratifiedSampler::new(16).divisions(), (4, 4));
        assert_eq!(StratifiedSampler::new(7).divisions(), (1, 7));
        assert_eq!(StratifiedSampler::new(1).divisions(), (1, 1));
    }

    #[test]
    fn one_sample_per_stratum() {
        let mut sampler = StratifiedSampler::new(12);
        let mut rng = Rng::from_seed(2);
        let (dx, dy) = sampler.divisions();
        let mut hits = vec![0; (dx * dy) as usize];
        sampler.start_pixel();
        while let Some((x, y)) = sampler.next_sample(&mut rng) {
            let cell = (y * dy as f32) as u32 * dx + (x * dx as f32) as u32;
            hits[cell as usize] += 1;
        }
        assert!(hits.iter().all(|h| *h == 1));
        assert_eq!(sampler.spp(), 12);
    }
}
