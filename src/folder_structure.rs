use jiff::Zoned;

use std::path::{Path, PathBuf};

use crate::config::OutputFormat;

pub struct PlotFolder {
    folder: PathBuf,
}

impl PlotFolder {
    pub fn new<P: AsRef<Path>>(output_folder: P, timestamped: bool) -> Self {
        let mut folder = output_folder.as_ref().to_path_buf();

        if timestamped {
            let timestamp: String = Zoned::now().strftime("%F--%H-%M-%S").to_string();
            folder.push(&timestamp);
        }

        Self { folder }
    }

    pub fn get(&self) -> &Path {
        &self.folder
    }

    pub fn image_path(&self, plot_name: &str, format: OutputFormat) -> PathBuf {
        let mut path = self.folder.clone();
        path.push(plot_name);
        path.set_extension(format.extension());
        path
    }
}
