//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use derivative::Derivative;
pub use image::{DynamicImage, GenericImageView as _, Rgb, RgbImage};
pub use itertools::Itertools as _;
pub use label::{BigGt, BoundingBox, Quad};
pub use log::Level;
pub use rand::{prelude::*, seq::SliceRandom};
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Cow,
    fmt::{self, Debug, Display},
    fs,
    io::{BufRead as _, BufReader},
    iter, mem,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
pub use structopt::StructOpt;

pub type Fallible<T> = Result<T, Error>;
