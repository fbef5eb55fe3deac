use earthwork_core::{
    DEFAULT_CELL_SIZE_FT, DEFAULT_CONTOUR_INTERVAL_FT, DEFAULT_DESIGN_ELEVATION_FT, contours,
    cut_fill, site_area_acres, slope, stats, synthesize,
};

fn main() -> earthwork_core::Result<()> {
    // Generate the 200×200 demo site
    let grid = synthesize(200, 200)?;
    let s = stats(&grid);
    println!(
        "elevation {:.2}..{:.2} ft (mean {:.2}, stddev {:.2}), relief {:.2} ft, {:.1} acres",
        s.min,
        s.max,
        s.mean,
        s.stddev,
        s.relief(),
        site_area_acres(&grid, DEFAULT_CELL_SIZE_FT)?
    );

    // Contours
    let set = contours(&grid, DEFAULT_CONTOUR_INTERVAL_FT)?;
    for level in &set {
        println!("  {:>6.1} ft: {} points", level.elevation, level.points.len());
    }

    // Earthwork for the default pad
    let cf = cut_fill(&grid, DEFAULT_DESIGN_ELEVATION_FT, DEFAULT_CELL_SIZE_FT)?;
    println!(
        "pad at {} ft: cut {} yd³, fill {} yd³, net {} yd³",
        DEFAULT_DESIGN_ELEVATION_FT, cf.cut_volume, cf.fill_volume, cf.net_volume
    );

    // Slope classes
    let hist = slope(&grid, DEFAULT_CELL_SIZE_FT)?.class_histogram();
    println!("slope classes: {:?}", hist);

    Ok(())
}
