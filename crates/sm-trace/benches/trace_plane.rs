use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sm_core::Image;
use sm_trace::{TraceConfig, trace_plane};

fn synthetic_labels(width: usize, height: usize) -> Image<u16> {
    let mut data = vec![0u16; width * height];
    let mut label = 1u16;

    for cy in (32..height.saturating_sub(32)).step_by(64) {
        for cx in (32..width.saturating_sub(32)).step_by(64) {
            let r = 12 + (label as usize % 14);
            for y in cy - r..cy + r {
                for x in cx - r..cx + r {
                    let dx = x as isize - cx as isize;
                    let dy = y as isize - cy as isize;
                    if (dx * dx + dy * dy) as usize <= r * r {
                        data[y * width + x] = label;
                    }
                }
            }
            label = label.wrapping_add(1).max(1);
        }
    }

    Image::from_vec(width, height, data).expect("synthetic plane size")
}

fn bench_trace(c: &mut Criterion) {
    let plane = synthetic_labels(1024, 1024);
    let plain = TraceConfig::default();
    let smoothed = TraceConfig {
        smooth_sigma: 1.5,
        shave_tolerance: 0.5,
        ..TraceConfig::default()
    };

    c.bench_function("sm_trace_plane_1024_plain", |b| {
        b.iter(|| {
            let t = trace_plane(&plane.as_view(), black_box(&plain));
            black_box(t.contours.len());
        });
    });

    c.bench_function("sm_trace_plane_1024_smoothed", |b| {
        b.iter(|| {
            let t = trace_plane(&plane.as_view(), black_box(&smoothed));
            black_box(t.contours.len());
        });
    });
}

criterion_group!(benches, bench_trace);
criterion_main!(benches);
