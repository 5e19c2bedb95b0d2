use crate::core::rng::Rng;

use super::PixelSamplerT;

#[derive(Clone, Copy)]
pub struct IndependentSampler {
    spp: u32,
    curr_ind: u32,
}

impl IndependentSampler {
    pub fn new(spp: u32) -> Self {
        Self { spp, curr_ind: 0 }
    }
}

impl PixelSamplerT for IndependentSampler {
    fn spp(&self) -> u32 {
        self.spp
    }

    fn start_pixel(&mut self) {
        self.curr_ind = 0;
    }

    fn next_sample(&mut self, rng: &mut Rng) -> Option<(f32, f32)> {
        if self.curr_ind < self.spp {
            self.curr_ind += 1;
            Some(rng.uniform_2d())
        } else {
            None
        }
    }
}
