/// Normalized 1D Gaussian kernel.
///
/// Conventions:
/// - `radius = ceil(3*sigma)`, minimum 1.
/// - `g` is normalized such that `sum(g) ~= 1`.
#[derive(Debug, Clone)]
pub struct GaussianKernel1D {
    pub sigma: f32,
    pub radius: usize,
    pub g: Vec<f32>,
}

impl GaussianKernel1D {
    pub fn new(sigma: f32) -> Self {
        assert!(
            sigma.is_finite() && sigma > 0.0,
            "sigma must be > 0 and finite"
        );

        let radius = ((3.0 * sigma).ceil() as usize).max(1);
        let len = 2 * radius + 1;

        let sigma2 = sigma * sigma;
        let mut g = vec![0.0f32; len];
        for (i, gi) in g.iter_mut().enumerate() {
            let xf = (i as isize - radius as isize) as f32;
            *gi = (-(xf * xf) / (2.0 * sigma2)).exp();
        }

        let sum_g: f32 = g.iter().sum();
        for gi in &mut g {
            *gi /= sum_g;
        }

        Self { sigma, radius, g }
    }
}

#[cfg(test)]
mod tests {
    use super::GaussianKernel1D;

    #[test]
    fn gaussian_is_normalized_and_symmetric() {
        let k = GaussianKernel1D::new(1.2);

        assert_eq!(k.radius, 4);
        let sum_g: f32 = k.g.iter().sum();
        assert!((sum_g - 1.0).abs() < 1e-5);

        for i in 1..=k.radius {
            assert!((k.g[k.radius + i] - k.g[k.radius - i]).abs() < 1e-7);
            assert!(k.g[k.radius + i] < k.g[k.radius + i - 1]);
        }
    }
}
