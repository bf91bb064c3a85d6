//! Benchmark suite for the pixel transcoder and chunk compressor
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use clockres_benches::{generate_test_bmp, sizes};
use clockres_types::file::{bmp, chunk};

/// Benchmark BMP to device-RGB transcoding across asset sizes and layouts
fn bench_transcode(c: &mut Criterion) {
	let mut group = c.benchmark_group("transcode");

	let cases = [
		("digit_565", sizes::DIGIT, 24, "digit0"),
		("hand_8565", sizes::HAND, 32, "hand"),
		("face360_565", sizes::FACE_360, 24, "bg"),
		("face466_8888", sizes::FACE_466, 32, "bg_8888"),
	];

	for (name, (width, height), bpp_bits, stem) in cases {
		let data = generate_test_bmp(width, height, bpp_bits);
		group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
		group.bench_with_input(BenchmarkId::new("bmp_to_rgb", name), &data, |b, data| {
			b.iter(|| {
				let result = bmp::transcode(stem, black_box(data));
				black_box(result)
			});
		});
	}

	group.finish();
}

/// Benchmark LZ4 chunk compression on a full-face background
fn bench_compress(c: &mut Criterion) {
	let mut group = c.benchmark_group("compress");

	let (width, height) = sizes::FACE_466;
	let data = generate_test_bmp(width, height, 32);
	let raw_chunk = bmp::transcode("bg", &data).expect("transcode test bmp");

	group.throughput(Throughput::Bytes(raw_chunk.len() as u64));
	group.bench_function("lz4_block", |b| {
		b.iter(|| {
			let result = chunk::compress(black_box(&raw_chunk));
			black_box(result)
		});
	});

	let compressed = chunk::compress(&raw_chunk).expect("compress test chunk");
	group.throughput(Throughput::Bytes(compressed.len() as u64));
	group.bench_function("lz4_expand", |b| {
		b.iter(|| {
			let result = chunk::decompress_payload(black_box(&compressed));
			black_box(result)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_transcode, bench_compress);
criterion_main!(benches);
