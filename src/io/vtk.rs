//! VTK output for structured finite-volume checkpoints.
//!
//! Each checkpoint is one VTK XML ImageData file (`.vti`) holding the
//! interior cells as cell data. A `.pvd` collection listing every file
//! with its physical time is rewritten after each save, so ParaView can
//! open the run as a time series while it is still in progress.
//!
//! # Example
//!
//! ```no_run
//! use fv_rs::io::{CheckpointSink, VtkCheckpointWriter};
//! use fv_rs::mesh::Grid;
//! use fv_rs::solver::FieldArray;
//! use fv_rs::types::CheckpointIndex;
//!
//! let grid = Grid::uniform(32, 32, 2, 0.0, 1.0, 0.0, 1.0);
//! let q = FieldArray::new(&grid, 4);
//! let mut writer = VtkCheckpointWriter::new("output", "sod", grid)?;
//! writer.save(&q, CheckpointIndex::ZERO, 0.0, 1e-3)?;
//! # Ok::<(), fv_rs::io::CheckpointError>(())
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::equations::{IP, IR, IU, IV, N_HYDRO};
use crate::mesh::Grid;
use crate::solver::FieldArray;
use crate::types::CheckpointIndex;

use super::checkpoint::{CheckpointError, CheckpointSink};

/// VTK XML writer helper.
struct VtkWriter<W: Write> {
    writer: BufWriter<W>,
    indent: usize,
}

impl<W: Write> VtkWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            indent: 0,
        }
    }

    fn write_indent(&mut self) -> std::io::Result<()> {
        for _ in 0..self.indent {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn write_header(&mut self, kind: &str) -> std::io::Result<()> {
        writeln!(self.writer, "<?xml version=\"1.0\"?>")?;
        writeln!(
            self.writer,
            "<VTKFile type=\"{}\" version=\"0.1\" byte_order=\"LittleEndian\">",
            kind
        )?;
        self.indent += 1;
        Ok(())
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        self.indent -= 1;
        writeln!(self.writer, "</VTKFile>")?;
        self.writer.flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, ">")?;
        self.indent += 1;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> std::io::Result<()> {
        self.indent -= 1;
        self.write_indent()?;
        writeln!(self.writer, "</{}>", name)?;
        Ok(())
    }

    fn empty_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> std::io::Result<()> {
        self.write_indent()?;
        write!(self.writer, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.writer, " {}=\"{}\"", key, value)?;
        }
        writeln!(self.writer, "/>")?;
        Ok(())
    }

    fn write_data_array_f64(
        &mut self,
        name: &str,
        data: &[f64],
        components: usize,
    ) -> std::io::Result<()> {
        self.write_indent()?;
        if components > 1 {
            writeln!(
                self.writer,
                "<DataArray type=\"Float64\" Name=\"{}\" NumberOfComponents=\"{}\" format=\"ascii\">",
                name, components
            )?;
        } else {
            writeln!(
                self.writer,
                "<DataArray type=\"Float64\" Name=\"{}\" format=\"ascii\">",
                name
            )?;
        }

        self.indent += 1;
        self.write_indent()?;
        for (i, &v) in data.iter().enumerate() {
            write!(self.writer, "{:.10e}", v)?;
            if i + 1 < data.len() {
                write!(self.writer, " ")?;
            }
            // Line break every 6 values for readability
            if (i + 1) % 6 == 0 && i + 1 < data.len() {
                writeln!(self.writer)?;
                self.write_indent()?;
            }
        }
        writeln!(self.writer)?;
        self.indent -= 1;

        self.write_indent()?;
        writeln!(self.writer, "</DataArray>")?;
        Ok(())
    }

    /// One `FieldData` block with a single-tuple array per entry.
    fn write_field_data(&mut self, values: &[(&str, f64)]) -> std::io::Result<()> {
        self.start_element("FieldData", &[])?;
        for (name, value) in values {
            self.write_indent()?;
            writeln!(
                self.writer,
                "<DataArray type=\"Float64\" Name=\"{}\" NumberOfTuples=\"1\" format=\"ascii\">",
                name
            )?;
            self.indent += 1;
            self.write_indent()?;
            writeln!(self.writer, "{:.16e}", value)?;
            self.indent -= 1;
            self.write_indent()?;
            writeln!(self.writer, "</DataArray>")?;
        }
        self.end_element("FieldData")?;
        Ok(())
    }
}

/// Write the interior of a primitive array as VTK ImageData.
fn write_vti(
    path: &Path,
    grid: &Grid,
    q: &FieldArray,
    index: CheckpointIndex,
    t: f64,
    dt: f64,
) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut vtk = VtkWriter::new(file);

    let bounds = grid.bounds();
    let extent = format!("0 {} 0 {} 0 0", grid.nx(), grid.ny());
    let origin = format!("{:.16e} {:.16e} 0", bounds.x_min, bounds.y_min);
    let spacing = format!("{:.16e} {:.16e} 1", grid.dx(), grid.dy());

    vtk.write_header("ImageData")?;
    vtk.start_element(
        "ImageData",
        &[
            ("WholeExtent", extent.as_str()),
            ("Origin", origin.as_str()),
            ("Spacing", spacing.as_str()),
        ],
    )?;
    vtk.write_field_data(&[("TIME", t), ("DT", dt), ("INDEX", index.get() as f64)])?;
    vtk.start_element("Piece", &[("Extent", extent.as_str())])?;
    vtk.start_element("CellData", &[("Scalars", "rho"), ("Vectors", "velocity")])?;

    vtk.write_data_array_f64("rho", &q.interior_values(grid, IR), 1)?;

    let velocity: Vec<f64> = grid
        .interior_cells()
        .flat_map(|(i, j)| [q.get(i, j, IU), q.get(i, j, IV), 0.0])
        .collect();
    vtk.write_data_array_f64("velocity", &velocity, 3)?;

    vtk.write_data_array_f64("pressure", &q.interior_values(grid, IP), 1)?;

    for s in 0..q.n_passive() {
        let name = format!("scalar_{}", s);
        vtk.write_data_array_f64(&name, &q.interior_values(grid, N_HYDRO + s), 1)?;
    }

    vtk.end_element("CellData")?;
    vtk.end_element("Piece")?;
    vtk.end_element("ImageData")?;
    vtk.write_footer()
}

/// Checkpoint sink writing `{prefix}_{index:04}.vti` files and `{prefix}.pvd`.
#[derive(Debug)]
pub struct VtkCheckpointWriter {
    directory: PathBuf,
    prefix: String,
    grid: Grid,
    /// `(time, file name)` of every file written so far
    series: Vec<(f64, String)>,
}

impl VtkCheckpointWriter {
    /// Create the writer and its output directory.
    pub fn new(
        directory: impl AsRef<Path>,
        prefix: impl Into<String>,
        grid: Grid,
    ) -> Result<Self, CheckpointError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            prefix: prefix.into(),
            grid,
            series: Vec::new(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file for checkpoint `index`.
    ///
    /// Creates a filename like `run_0001.vti` for index 1.
    pub fn file_path(&self, index: CheckpointIndex) -> PathBuf {
        self.directory
            .join(format!("{}_{:04}.vti", self.prefix, index.get()))
    }

    /// Path of the `.pvd` collection.
    pub fn collection_path(&self) -> PathBuf {
        self.directory.join(format!("{}.pvd", self.prefix))
    }

    /// Rewrite the whole `.pvd`; cost grows with the number of checkpoints,
    /// which stays small at checkpoint cadence.
    fn write_collection(&self) -> std::io::Result<()> {
        let file = File::create(self.collection_path())?;
        let mut vtk = VtkWriter::new(file);

        vtk.write_header("Collection")?;
        vtk.start_element("Collection", &[])?;
        for (t, name) in &self.series {
            let timestep = format!("{:.16e}", t);
            vtk.empty_element(
                "DataSet",
                &[
                    ("timestep", timestep.as_str()),
                    ("group", ""),
                    ("part", "0"),
                    ("file", name.as_str()),
                ],
            )?;
        }
        vtk.end_element("Collection")?;
        vtk.write_footer()
    }
}

impl CheckpointSink for VtkCheckpointWriter {
    fn save(
        &mut self,
        q: &FieldArray,
        index: CheckpointIndex,
        t: f64,
        dt: f64,
    ) -> Result<(), CheckpointError> {
        if !q.matches_grid(&self.grid) {
            return Err(CheckpointError::ShapeMismatch {
                expected: (self.grid.ntx(), self.grid.nty()),
                found: (q.ntx(), q.nty()),
            });
        }

        let path = self.file_path(index);
        write_vti(&path, &self.grid, q, index, t, dt)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.series.push((t, name));
        self.write_collection()?;

        debug!(path = %path.display(), "checkpoint written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::PrimitiveState;
    use std::fs;
    use tempfile::tempdir;

    fn state(grid: &Grid) -> FieldArray {
        let mut q = FieldArray::new(grid, N_HYDRO + 1);
        for (i, j) in grid.interior_cells() {
            q.set_primitive(i, j, &PrimitiveState::new(1.0, 0.5, -0.5, 2.0));
            q.set(i, j, N_HYDRO, 0.25);
        }
        q
    }

    #[test]
    fn test_save_creates_vti_and_pvd() {
        let dir = tempdir().unwrap();
        let grid = Grid::uniform(3, 2, 2, 0.0, 1.0, 0.0, 1.0);
        let mut writer = VtkCheckpointWriter::new(dir.path().join("out"), "run", grid).unwrap();
        let q = state(&grid);

        writer.save(&q, CheckpointIndex::new(0), 0.0, 0.01).unwrap();
        writer.save(&q, CheckpointIndex::new(1), 0.05, 0.01).unwrap();

        let vti = writer.file_path(CheckpointIndex::new(1));
        assert!(vti.to_string_lossy().ends_with("run_0001.vti"));
        let content = fs::read_to_string(&vti).unwrap();
        assert!(content.contains("type=\"ImageData\""));
        assert!(content.contains("WholeExtent=\"0 3 0 2 0 0\""));
        assert!(content.contains("Name=\"rho\""));
        assert!(content.contains("Name=\"velocity\" NumberOfComponents=\"3\""));
        assert!(content.contains("Name=\"pressure\""));
        assert!(content.contains("Name=\"scalar_0\""));
        assert!(content.contains("Name=\"TIME\""));

        let pvd = fs::read_to_string(writer.collection_path()).unwrap();
        assert_eq!(pvd.matches("<DataSet").count(), 2);
        assert!(pvd.contains("file=\"run_0000.vti\""));
        assert!(pvd.contains("file=\"run_0001.vti\""));
    }

    #[test]
    fn test_save_rejects_wrong_grid() {
        let dir = tempdir().unwrap();
        let grid = Grid::uniform(3, 2, 2, 0.0, 1.0, 0.0, 1.0);
        let other = Grid::uniform(4, 2, 2, 0.0, 1.0, 0.0, 1.0);
        let mut writer = VtkCheckpointWriter::new(dir.path(), "run", grid).unwrap();

        let err = writer
            .save(&FieldArray::new(&other, 4), CheckpointIndex::ZERO, 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::ShapeMismatch {
                expected: (7, 6),
                found: (8, 6)
            }
        ));
    }
}
