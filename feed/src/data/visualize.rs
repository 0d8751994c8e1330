use crate::{common::*, config::VisualizeConfig, logging::Logger};

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draws small boxes onto sample images.
#[derive(Debug, Clone)]
pub struct Visualizer {
    output_dir: Option<PathBuf>,
    logger: Logger,
}

impl Visualizer {
    pub fn new(config: Option<&VisualizeConfig>, logger: Logger) -> Self {
        Self {
            output_dir: config.map(|config| config.output_dir.clone()),
            logger,
        }
    }

    /// Draw the boxes and save the rendering if an output directory is set.
    pub fn render(
        &self,
        image: DynamicImage,
        boxes: &[BoundingBox],
        image_path: &Path,
    ) -> Result<DynamicImage> {
        let mut canvas = image.to_rgb8();
        boxes.iter().for_each(|bbox| draw_rect(&mut canvas, bbox));

        if let Some(output_dir) = &self.output_dir {
            let stem = image_path
                .file_stem()
                .ok_or_else(|| format_err!("invalid image path '{}'", image_path.display()))?;
            let mut file_name = stem.to_owned();
            file_name.push(".png");
            let output_path = output_dir.join(file_name);

            fs::create_dir_all(output_dir)?;
            canvas
                .save(&output_path)
                .with_context(|| format!("failed to save '{}'", output_path.display()))?;
            self.logger
                .debug(format_args!("saved rendering '{}'", output_path.display()));
        }

        Ok(DynamicImage::ImageRgb8(canvas))
    }
}

/// Draw a one-pixel rectangle outline, clipped to the canvas.
fn draw_rect(canvas: &mut RgbImage, bbox: &BoundingBox) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    let [x1, y1, x2, y2] = bbox.corners();
    let (l, r) = (x1.min(x2) as i64, x1.max(x2) as i64);
    let (t, b) = (y1.min(y2) as i64, y1.max(y2) as i64);
    if r < 0 || b < 0 || l > max_x || t > max_y {
        return;
    }

    let mut put = |x: i64, y: i64| {
        if (0..=max_x).contains(&x) && (0..=max_y).contains(&y) {
            canvas.put_pixel(x as u32, y as u32, BOX_COLOR);
        }
    };

    for x in l.max(0)..=r.min(max_x) {
        put(x, t);
        put(x, b);
    }
    for y in t.max(0)..=b.min(max_y) {
        put(l, y);
        put(r, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_draws_outline_only() {
        let visualizer = Visualizer::new(None, Logger::default());
        let image = DynamicImage::ImageRgb8(RgbImage::new(30, 30));
        let rendered = visualizer
            .render(image, &[BoundingBox::new(20, 20, 10, 10)], Path::new("a.jpg"))
            .unwrap()
            .to_rgb8();

        assert_eq!(*rendered.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*rendered.get_pixel(20, 15), BOX_COLOR);
        assert_eq!(*rendered.get_pixel(15, 20), BOX_COLOR);
        assert_eq!(*rendered.get_pixel(15, 15), Rgb([0, 0, 0]));
        assert_eq!(*rendered.get_pixel(25, 25), Rgb([0, 0, 0]));
    }

    #[test]
    fn render_clips_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let config = VisualizeConfig {
            output_dir: dir.path().join("vis"),
        };
        let visualizer = Visualizer::new(Some(&config), Logger::default());
        let image = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        visualizer
            .render(
                image,
                &[BoundingBox::new(-5, -5, 100, 4), BoundingBox::new(50, 50, 60, 60)],
                Path::new("images/b.jpg"),
            )
            .unwrap();

        let saved = image::open(dir.path().join("vis/b.png")).unwrap().to_rgb8();
        assert_eq!(*saved.get_pixel(3, 4), BOX_COLOR);
        assert_eq!(*saved.get_pixel(3, 3), Rgb([0, 0, 0]));
    }
}
