//! mapdump
//!
//! Offline check for the two map passes: generates the height field and
//! the derived normal map at the default panel settings and writes both
//! as PNGs into the working directory, for eyeballing outside the app.

use bevy::math::Vec3;
use image::{Rgb, RgbImage};

use bevy_skyterra::config::{MAP_RESOLUTION, NOISE_SEED};
use bevy_skyterra::params::TerrainParams;
use bevy_skyterra::systems::terrain::heightfield::HeightField;
use bevy_skyterra::systems::terrain::normalmap::NormalMap;

fn main() -> image::ImageResult<()> {
    let params = TerrainParams::default();

    let mut height = HeightField::new(MAP_RESOLUTION, NOISE_SEED);
    height.regenerate(params.heightmap_scale, 0.0);
    let mut normals = NormalMap::new(MAP_RESOLUTION);
    normals.derive(&height, params.normal_strength);

    let size = MAP_RESOLUTION as u32;
    let mut height_img = RgbImage::new(size, size);
    let mut normal_img = RgbImage::new(size, size);

    for y in 0..MAP_RESOLUTION {
        for x in 0..MAP_RESOLUTION {
            let h = (height.value(x as isize, y as isize) * 255.0) as u8;
            height_img.put_pixel(x as u32, y as u32, Rgb([h, h, h]));

            let encoded = normals.texel(x, y) * 0.5 + Vec3::splat(0.5);
            normal_img.put_pixel(
                x as u32,
                y as u32,
                Rgb([
                    (encoded.x * 255.0) as u8,
                    (encoded.y * 255.0) as u8,
                    (encoded.z * 255.0) as u8,
                ]),
            );
        }
    }

    height_img.save("heightmap.png")?;
    normal_img.save("normalmap.png")?;
    println!(
        "wrote heightmap.png and normalmap.png ({MAP_RESOLUTION}x{MAP_RESOLUTION}, scale {}, strength {})",
        params.heightmap_scale, params.normal_strength
    );

    Ok(())
}
