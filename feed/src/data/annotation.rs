use crate::{common::*, error::MalformedLine, logging::Logger};
use label::QUAD_LEN;

/// Parses the two annotation formats of an image.
#[derive(Debug, Clone)]
pub struct AnnotationLoader {
    logger: Logger,
}

impl AnnotationLoader {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Load small boxes, one `x_min,y_min,x_max,y_max` row per line.
    ///
    /// A row that is not exactly four integers fails the whole file.
    /// Blank lines are ignored.
    pub fn load_boxes<P>(&self, path: P) -> Result<Vec<BoundingBox>>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut boxes = vec![];

        for (line_no, line) in read_lines(path)? {
            if line.trim().is_empty() {
                continue;
            }

            let corners: Vec<i32> = line
                .trim()
                .split(',')
                .map(|token| token.trim().parse::<i32>())
                .collect::<Result<_, _>>()
                .map_err(|err| malformed(path, line_no, &line, format!("{}", err)))?;
            let corners: [i32; 4] = corners.try_into().map_err(|values: Vec<i32>| {
                malformed(
                    path,
                    line_no,
                    &line,
                    format!("expect 4 values, but found {}", values.len()),
                )
            })?;

            boxes.push(BoundingBox::from(corners));
        }

        Ok(boxes)
    }

    /// Load big ground truth polygons from the first eight values of each line.
    ///
    /// Lines with fewer than eight values, or with values that are not finite
    /// numbers, are logged and dropped.
    pub fn load_big_gt<P>(&self, path: P) -> Result<BigGt>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut big_gt = BigGt::new();

        for (line_no, line) in read_lines(path)? {
            if line.trim().is_empty() {
                continue;
            }

            match parse_quad(&line) {
                Ok(quad) => big_gt.push(quad),
                Err(reason) => {
                    let err = malformed(path, line_no, &line, reason);
                    self.logger.error(format_args!("{}", err));
                }
            }
        }

        Ok(big_gt)
    }
}

fn parse_quad(line: &str) -> Result<Quad, String> {
    let tokens: Vec<_> = line.trim().split(',').take(QUAD_LEN).collect();
    if tokens.len() != QUAD_LEN {
        return Err(format!(
            "expect at least {} values, but found {}",
            QUAD_LEN,
            tokens.len()
        ));
    }

    let mut values = [0f64; QUAD_LEN];
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", token.trim()))?;
    }

    Quad::try_from_reals(values).ok_or_else(|| "coordinates out of range".to_string())
}

fn read_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open annotation file '{}'", path.display()))?;
    BufReader::new(file)
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let line = line
                .with_context(|| format!("failed to read annotation file '{}'", path.display()))?;
            Ok((index + 1, line))
        })
        .collect()
}

fn malformed<R>(path: &Path, line_no: usize, line: &str, reason: R) -> MalformedLine
where
    R: Into<Cow<'static, str>>,
{
    MalformedLine {
        path: path.to_owned(),
        line_no,
        line: line.to_owned(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn boxes_one_per_line_with_text_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "a.txt",
            "1192,1862,2424,1895\n0, 0, 16, 32\n20,20,10,10\n",
        );

        let boxes = AnnotationLoader::new(Logger::default())
            .load_boxes(&path)
            .unwrap();

        assert_eq!(boxes.len(), 3);
        assert!(boxes.iter().all(|bbox| bbox.label == 1));
        assert_eq!(boxes[0].to_array(), [1192, 1862, 2424, 1895, 1]);
        assert_eq!(boxes[1].to_array(), [0, 0, 16, 32, 1]);
        assert_eq!(boxes[2].to_array(), [20, 20, 10, 10, 1]);
    }

    #[test]
    fn boxes_fail_on_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AnnotationLoader::new(Logger::default());

        let path = write_file(dir.path(), "float.txt", "1,2,3,4\n1.5,2,3,4\n");
        let err = loader.load_boxes(&path).unwrap_err();
        let err = err.downcast_ref::<MalformedLine>().unwrap();
        assert_eq!(err.line_no, 2);

        let path = write_file(dir.path(), "short.txt", "1,2,3\n");
        assert!(loader.load_boxes(&path).is_err());

        let path = write_file(dir.path(), "long.txt", "1,2,3,4,5\n");
        assert!(loader.load_boxes(&path).is_err());
    }

    #[test]
    fn boxes_ignore_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AnnotationLoader::new(Logger::default());

        let path = write_file(dir.path(), "blank.txt", "\n1,2,3,4\n   \n\n5,6,7,8\n\n");
        let boxes = loader.load_boxes(&path).unwrap();
        assert_eq!(
            boxes.iter().map(BoundingBox::to_array).collect::<Vec<_>>(),
            [[1, 2, 3, 4, 1], [5, 6, 7, 8, 1]]
        );

        let path = write_file(dir.path(), "only_blank.txt", "\n\n");
        assert!(loader.load_boxes(&path).unwrap().is_empty());
    }

    #[test]
    fn boxes_fail_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AnnotationLoader::new(Logger::default());
        assert!(loader.load_boxes(dir.path().join("none.txt")).is_err());
    }

    #[test]
    fn big_gt_drops_short_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "a.txt",
            "10,10,20,10,20,20,10,20\n1,2,3,4,5\n",
        );

        let big_gt = AnnotationLoader::new(Logger::default())
            .load_big_gt(&path)
            .unwrap();

        assert_eq!(big_gt.as_slice(), &[10, 10, 20, 10, 20, 20, 10, 20]);
    }

    #[test]
    fn big_gt_uses_first_eight_values_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "a.txt",
            "10.7,10.2,20,10,20,20,10,20,###,extra\n\
             1,2,3,4,5,6,7,8.9\n\
             a,b,c,d,e,f,g,h\n\
             \n\
             -1.5,0,0,0,0,0,0,0",
        );

        let big_gt = AnnotationLoader::new(Logger::default())
            .load_big_gt(&path)
            .unwrap();

        assert_eq!(big_gt.len() % QUAD_LEN, 0);
        assert_eq!(
            big_gt.as_slice(),
            &[
                10, 10, 20, 10, 20, 20, 10, 20, //
                1, 2, 3, 4, 5, 6, 7, 8, //
                -1, 0, 0, 0, 0, 0, 0, 0,
            ]
        );
    }

    #[test]
    fn big_gt_of_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.txt", "1,2,3\n4,5,6,7\n");
        let big_gt = AnnotationLoader::new(Logger::default())
            .load_big_gt(&path)
            .unwrap();
        assert!(big_gt.is_empty());
    }
}
