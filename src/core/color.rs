use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

/// Linear RGB radiance.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Rec. 709 luminance of linear values.
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn max_component(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    pub fn is_black(&self) -> bool {
        self.r <= 0.0 && self.g <= 0.0 && self.b <= 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

macro_rules! color_binary_op {
    ( $( ($trait:ident, $func:ident, $assign_trait:ident, $assign_func:ident, $op:tt) ),+ $(,)? ) => {
        $(
            impl $trait for Color {
                type Output = Self;

                fn $func(self, rhs: Self) -> Self::Output {
                    Self::new(self.r $op rhs.r, self.g $op rhs.g, self.b $op rhs.b)
                }
            }

            impl $trait<f32> for Color {
                type Output = Self;

                fn $func(self, rhs: f32) -> Self::Output {
                    Self::new(self.r $op rhs, self.g $op rhs, self.b $op rhs)
                }
            }

            impl $assign_trait for Color {
                fn $assign_func(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }

            impl $assign_trait<f32> for Color {
                fn $assign_func(&mut self, rhs: f32) {
                    *self = *self $op rhs;
                }
            }
        )+
    };
}

color_binary_op! {
    (Add, add, AddAssign, add_assign, +),
    (Mul, mul, MulAssign, mul_assign, *),
    (Div, div, DivAssign, div_assign, /),
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}

impl From<[f32; 3]> for Color {
    fn from(value: [f32; 3]) -> Self {
        Color::new(value[0], value[1], value[2])
    }
}

/// sRGB transfer function followed by 8-bit quantization.
pub fn linear_to_srgb_u8(v: f32) -> u8 {
    let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    let encoded = if v <= 0.003_130_8 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}
