// PNG views of a DEM and its analyses, one `scale × scale` block per cell.

use earthwork_core::utils::normalize_unit;
use earthwork_core::{CellMap, ContourSet, ElevationGrid, GridStats, SlopeClass, SlopeField};
use image::{Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

// Heatmap colours saturate at this many feet of cut or fill
const CUT_FILL_SATURATION_FT: f64 = 15.0;
// Contour levels on multiples of this are drawn as major lines
const MAJOR_CONTOUR_FT: f64 = 10.0;

fn hex(rgb: u32) -> LinSrgb {
    LinSrgb::new(
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
    )
}

fn to_pixel(color: LinSrgb) -> Rgb<u8> {
    let c = color.into_format::<u8>();
    Rgb([c.red, c.green, c.blue])
}

// Paint each cell as a solid block
fn paint_cells<F>(width: usize, height: usize, scale: u32, mut color_at: F) -> RgbImage
where
    F: FnMut(usize, usize) -> Rgb<u8>,
{
    let scale = scale.max(1);
    let mut img = RgbImage::new(width as u32 * scale, height as u32 * scale);
    for y in 0..height {
        for x in 0..width {
            let pixel = color_at(x, y);
            for py in 0..scale {
                for px in 0..scale {
                    img.put_pixel(x as u32 * scale + px, y as u32 * scale + py, pixel);
                }
            }
        }
    }
    img
}

// Lambertian shading from the NW at 45° altitude, in [0, 1]
fn hillshade(grid: &ElevationGrid, x: usize, y: usize, cell_size_ft: f64) -> f32 {
    let (xi, yi) = (x as isize, y as isize);
    let dzdx = (grid.get_clamped(xi + 1, yi) - grid.get_clamped(xi - 1, yi)) / (2.0 * cell_size_ft);
    let dzdy = (grid.get_clamped(xi, yi + 1) - grid.get_clamped(xi, yi - 1)) / (2.0 * cell_size_ft);

    let (nx, ny, nz) = (-dzdx, -dzdy, 1.0);
    let len = (nx * nx + ny * ny + nz * nz).sqrt();

    let azimuth = std::f64::consts::FRAC_PI_4;
    let (sin_alt, cos_alt) = std::f64::consts::FRAC_PI_4.sin_cos();
    // +x is east and +y is south, so NW is (-x, -y)
    let (lx, ly, lz) = (-azimuth.cos() * cos_alt, -azimuth.sin() * cos_alt, sin_alt);

    ((nx * lx + ny * ly + nz * lz) / len).max(0.0) as f32
}

// Green → olive → tan → white by elevation, lit by a hillshade.
pub fn elevation_image(
    grid: &ElevationGrid,
    stats: &GridStats,
    cell_size_ft: f64,
    scale: u32,
) -> RgbImage {
    let gradient = Gradient::with_domain(vec![
        (0.00, hex(0x1a472a)),
        (0.25, hex(0x2d8c4e)),
        (0.50, hex(0x8c7a3c)),
        (0.75, hex(0xa0825c)),
        (1.00, hex(0xf0f0f0)),
    ]);

    paint_cells(grid.width(), grid.height(), scale, |x, y| {
        let t = normalize_unit(grid.get(x, y), stats.min, stats.max) as f32;
        let light = (hillshade(grid, x, y, cell_size_ft) * 0.5 + 0.5).clamp(0.0, 1.0);
        let c = to_pixel(gradient.get(t));
        Rgb([
            (c[0] as f32 * light) as u8,
            (c[1] as f32 * light) as u8,
            (c[2] as f32 * light) as u8,
        ])
    })
}

// Grey at grade, red for cut, blue for fill.
pub fn cut_fill_image(heatmap: &CellMap<f64>, scale: u32) -> RgbImage {
    let height = heatmap.len();
    let width = heatmap.first().map_or(0, Vec::len);
    let cut = Gradient::new(vec![hex(0x333333), hex(0xff2222)]);
    let fill = Gradient::new(vec![hex(0x333333), hex(0x2266ff)]);

    paint_cells(width, height, scale, |x, y| {
        let diff = heatmap[y][x];
        let t = (diff.abs() / CUT_FILL_SATURATION_FT).min(1.0) as f32;
        if diff > 0.0 {
            to_pixel(cut.get(t))
        } else {
            to_pixel(fill.get(t))
        }
    })
}

pub fn slope_class_color(class: SlopeClass) -> Rgb<u8> {
    match class {
        SlopeClass::Gentle => Rgb([0x22, 0xcc, 0x44]),
        SlopeClass::Moderate => Rgb([0xcc, 0xcc, 0x22]),
        SlopeClass::Steep => Rgb([0xff, 0x88, 0x00]),
        SlopeClass::VerySteep => Rgb([0xff, 0x22, 0x22]),
    }
}

pub fn slope_image(field: &SlopeField, scale: u32) -> RgbImage {
    let height = field.gradient.len();
    let width = field.gradient.first().map_or(0, Vec::len);
    paint_cells(width, height, scale, |x, y| {
        slope_class_color(SlopeClass::from_percent(field.gradient[y][x]))
    })
}

// Topographic tint with contour crossings dotted on top in white.
pub fn contour_image(
    grid: &ElevationGrid,
    stats: &GridStats,
    set: &ContourSet,
    scale: u32,
) -> RgbImage {
    let scale = scale.max(1);
    let mut img = paint_cells(grid.width(), grid.height(), scale, |x, y| {
        let t = normalize_unit(grid.get(x, y), stats.min, stats.max);
        Rgb([
            (30.0 + t * 180.0).round() as u8,
            (120.0 - t * 60.0).round() as u8,
            (30.0 + (1.0 - t) * 40.0).round() as u8,
        ])
    });

    let (w, h) = (img.width() as f64, img.height() as f64);
    for level in set {
        let major = (level.elevation / MAJOR_CONTOUR_FT).fract().abs() < 1e-9;
        let alpha = if major { 0.8 } else { 0.3 };
        for &[cx, cy] in &level.points {
            // Centre of the cell block the point falls in
            let px = (cx * scale as f64 + scale as f64 / 2.0).min(w - 1.0) as u32;
            let py = (cy * scale as f64 + scale as f64 / 2.0).min(h - 1.0) as u32;
            let under = *img.get_pixel(px, py);
            img.put_pixel(px, py, blend_white(under, alpha));
        }
    }
    img
}

fn blend_white(under: Rgb<u8>, alpha: f64) -> Rgb<u8> {
    let mix = |c: u8| (c as f64 * (1.0 - alpha) + 255.0 * alpha).round() as u8;
    Rgb([mix(under[0]), mix(under[1]), mix(under[2])])
}
