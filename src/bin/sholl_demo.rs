use sholl_analysis::config::parse_cli;
use sholl_analysis::image::io::{load_grayscale_image, save_grayscale_f32, write_json_file};
use sholl_analysis::mask::render_mask;
use sholl_analysis::ShollAnalyzer;
use std::env;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = parse_cli(&args)?;

    let gray = load_grayscale_image(&config.input_path)?;
    let image = gray.as_view();
    let (params, descriptors) = config.analysis.resolve(gray.width(), gray.height());

    let norm_label = descriptors.normalizer.label(params.dim);
    let analyzer =
        ShollAnalyzer::new(params.clone(), descriptors).map_err(|e| e.to_string())?;
    let report = analyzer.analyze_image(&image);

    println!(
        "Sampled {} radii ({} intersecting) in {:.3} ms",
        report.profile.len(),
        report.filtered.len(),
        report.elapsed_ms
    );
    println!("\nRadius\tInters.");
    for point in report.profile.points() {
        println!("{:.2}\t{:.2}", point.radius, point.count);
    }
    if !report.filtered.is_empty() {
        println!("\nRadius\tInters./{norm_label}\tlog(Radius)\tlog(Inters./{norm_label})");
        for (norm, log) in report
            .normalized
            .points()
            .iter()
            .zip(report.log_log.points())
        {
            println!(
                "{:.2}\t{:.5}\t{:.4}\t{:.4}",
                norm.radius, norm.count, log.radius, log.count
            );
        }
    }

    let entries = report.descriptor_entries();
    if entries.is_empty() {
        println!("\nNo descriptors: all intersection counts were zero.");
    } else {
        println!("\nDescriptors:");
        for (name, value) in entries {
            println!("  {name}: {value:.4}");
        }
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    }

    if let Some(path) = &config.output.mask_out {
        let values = match &report.poly_fit {
            Some(curve) => curve.sample(&report.profile.radii()),
            None => report.profile.counts(),
        };
        let mask = render_mask(&image, &params, &values);
        save_grayscale_f32(&mask, path)?;
        println!("Intersections mask written to {}", path.display());
    }

    Ok(())
}
