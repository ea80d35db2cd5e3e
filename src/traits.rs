pub trait FloatConst {
    const ZERO: Self;
    const HALF: Self;
    const ONE: Self;
    const TWO: Self;
    const FOUR: Self;
    const FIFTY: Self;
    const HUNDRED: Self;
}

impl FloatConst for f32 {
    const ZERO: Self = 0_f32;
    const HALF: Self = 0.5_f32;
    const ONE: Self = 1_f32;
    const TWO: Self = 2_f32;
    const FOUR: Self = 4_f32;
    const FIFTY: Self = 50_f32;
    const HUNDRED: Self = 100_f32;
}

impl FloatConst for f64 {
    const ZERO: Self = 0_f64;
    const HALF: Self = 0.5_f64;
    const ONE: Self = 1_f64;
    const TWO: Self = 2_f64;
    const FOUR: Self = 4_f64;
    const FIFTY: Self = 50_f64;
    const HUNDRED: Self = 100_f64;
}
