use sholl_analysis::image::VoxelStackF32;

/// Paint a filled disk into an 8-bit buffer. Coverage extends three quarters
/// of a pixel past the radius: digital-circle points stray up to half a pixel
/// diagonal (~0.71 px) from the true circle, so this keeps a shell sampled
/// exactly at `radius` inside the disk.
pub fn paint_disk(buffer: &mut [u8], width: usize, cx: i32, cy: i32, radius: i32, value: u8) {
    let limit = (radius as f64 + 0.75) * (radius as f64 + 0.75);
    let height = buffer.len() / width;
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
            if dx * dx + dy * dy <= limit {
                buffer[y as usize * width + x as usize] = value;
            }
        }
    }
}

pub fn filled_disk_u8(
    width: usize,
    height: usize,
    cx: i32,
    cy: i32,
    radius: i32,
    value: u8,
) -> Vec<u8> {
    let mut buffer = vec![0u8; width * height];
    paint_disk(&mut buffer, width, cx, cy, radius, value);
    buffer
}

/// Four axis-aligned spokes of the given length radiating from the center:
/// every circle of smaller radius crosses the arbor exactly four times.
pub fn spoked_arbor_u8(
    width: usize,
    height: usize,
    cx: i32,
    cy: i32,
    length: i32,
    value: u8,
) -> Vec<u8> {
    let mut buffer = vec![0u8; width * height];
    for i in 1..=length {
        for (x, y) in [
            (cx + i, cy),
            (cx - i, cy),
            (cx, cy + i),
            (cx, cy - i),
        ] {
            if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                buffer[y as usize * width + x as usize] = value;
            }
        }
    }
    buffer
}

/// Filled ball in a voxel stack, with the same boundary coverage rule as
/// `paint_disk`.
pub fn filled_ball_stack(
    size: usize,
    cx: i32,
    cy: i32,
    cz: i32,
    radius: i32,
    value: f32,
) -> VoxelStackF32 {
    let mut stack = VoxelStackF32::new(size, size, size);
    let limit = (radius as f64 + 0.75) * (radius as f64 + 0.75);
    for z in 0..size as i32 {
        for y in 0..size as i32 {
            for x in 0..size as i32 {
                let (dx, dy, dz) = ((x - cx) as f64, (y - cy) as f64, (z - cz) as f64);
                if dx * dx + dy * dy + dz * dz <= limit {
                    stack.set(x as usize, y as usize, z as usize, value);
                }
            }
        }
    }
    stack
}
