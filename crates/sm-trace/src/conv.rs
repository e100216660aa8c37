/// Correlates `signal` with a symmetric `kernel` of length `2*radius+1`.
/// Samples outside the signal read as `fill`.
pub fn convolve_f32(signal: &[f32], kernel: &[f32], radius: usize, fill: f32, out: &mut [f32]) {
    assert_eq!(out.len(), signal.len(), "out must match signal length");
    assert_eq!(
        kernel.len(),
        2 * radius + 1,
        "kernel len must be 2*radius+1"
    );

    let n = signal.len() as isize;
    for (i, out_i) in out.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (k, &kv) in kernel.iter().enumerate() {
            let idx = i as isize + radius as isize - k as isize;
            let v = if (0..n).contains(&idx) {
                signal[idx as usize]
            } else {
                fill
            };
            acc += v * kv;
        }
        *out_i = acc;
    }
}
