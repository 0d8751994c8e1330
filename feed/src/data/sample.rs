use crate::common::*;

/// The `(height, width, channels)` shape of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageInfo {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageInfo {
    pub fn of(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            height: height as usize,
            width: width as usize,
            channels: image.color().channel_count() as usize,
        }
    }

    pub fn to_array(&self) -> [usize; 3] {
        [self.height, self.width, self.channels]
    }
}

/// One labeled training image.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Sample {
    /// The decoded image. It always holds exactly one image.
    #[derivative(Debug = "ignore")]
    pub images: Vec<DynamicImage>,
    /// Small boxes.
    pub boxes: Vec<BoundingBox>,
    pub image_info: ImageInfo,
    /// The image path. It always holds exactly one path.
    pub filenames: Vec<PathBuf>,
    pub big_gt: BigGt,
}

impl Sample {
    pub fn new(image: DynamicImage, path: PathBuf, boxes: Vec<BoundingBox>, big_gt: BigGt) -> Self {
        let image_info = ImageInfo::of(&image);
        Self {
            images: vec![image],
            boxes,
            image_info,
            filenames: vec![path],
            big_gt,
        }
    }

    /// The `[x_min, y_min, x_max, y_max, label]` rows of the small boxes.
    pub fn box_rows(&self) -> Vec<[i32; 5]> {
        self.boxes.iter().map(BoundingBox::to_array).collect()
    }
}
