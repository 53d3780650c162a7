//! Pretrained next-step price model.
//!
//! The network is a stack of (optionally bidirectional) LSTM layers followed by
//! linear dense layers, evaluated for inference only. Weights are read from a JSON
//! export of the trained network using the Keras tensor layout:
//!
//! * LSTM `kernel` is `[input_dim][4 * units]`, `recurrent_kernel` is
//!   `[units][4 * units]`, `bias` is `[4 * units]`, gates ordered i, f, c, o.
//! * Dense `kernel` is `[input_dim][output_dim]`, `bias` is `[output_dim]`.
//!
//! Dropout layers are identity at inference time and are not part of the file.

use {
    crate::error::{AnalysisError, AnalysisResult},
    anyhow::{Context, Result, bail, ensure},
    ndarray::{Array1, Array2, s},
    serde::{Deserialize, Serialize},
    std::{
        path::Path,
        sync::{Arc, Mutex},
    },
};

/// Maps a window of normalized prices to the next normalized price.
pub trait SequenceModel: Send + Sync {
    /// Number of observations expected per call.
    fn window_len(&self) -> usize;

    fn predict(&self, window: &[f64]) -> AnalysisResult<f64>;
}

/// Read-only model shared by every request. Loaded once at startup.
pub type ModelHandle = Arc<dyn SequenceModel>;

/// Model whose inference mutates internal state (scratch buffers, session handles).
pub trait StatefulModel: Send {
    fn window_len(&self) -> usize;

    fn predict_mut(&mut self, window: &[f64]) -> AnalysisResult<f64>;
}

/// Serializes access to a model that is not safe for concurrent inference.
pub struct Serialized<M> {
    window_len: usize,
    inner: Mutex<M>,
}

impl<M: StatefulModel> Serialized<M> {
    pub fn new(model: M) -> Self {
        Self {
            window_len: model.window_len(),
            inner: Mutex::new(model),
        }
    }
}

impl<M: StatefulModel> SequenceModel for Serialized<M> {
    fn window_len(&self) -> usize {
        self.window_len
    }

    fn predict(&self, window: &[f64]) -> AnalysisResult<f64> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| AnalysisError::computation("model lock poisoned"))?;
        guard.predict_mut(window)
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// One direction of an LSTM layer.
#[derive(Debug, Clone)]
pub struct LstmCell {
    units: usize,
    kernel: Array2<f64>,
    recurrent_kernel: Array2<f64>,
    bias: Array1<f64>,
}

impl LstmCell {
    pub fn new(
        kernel: Array2<f64>,
        recurrent_kernel: Array2<f64>,
        bias: Array1<f64>,
    ) -> Result<Self> {
        let gates = kernel.ncols();
        ensure!(
            gates > 0 && gates % 4 == 0,
            "LSTM kernel must have 4 * units columns, got {}",
            gates
        );
        let units = gates / 4;
        ensure!(
            recurrent_kernel.dim() == (units, gates),
            "LSTM recurrent kernel must be {}x{}, got {:?}",
            units,
            gates,
            recurrent_kernel.dim()
        );
        ensure!(
            bias.len() == gates,
            "LSTM bias must have {} entries, got {}",
            gates,
            bias.len()
        );
        Ok(Self {
            units,
            kernel,
            recurrent_kernel,
            bias,
        })
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn input_dim(&self) -> usize {
        self.kernel.nrows()
    }

    fn step(
        &self,
        x: &Array1<f64>,
        h_prev: &Array1<f64>,
        c_prev: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let u = self.units;
        let z = x.dot(&self.kernel) + h_prev.dot(&self.recurrent_kernel) + &self.bias;

        let i_gate = z.slice(s![0..u]).mapv(sigmoid);
        let f_gate = z.slice(s![u..2 * u]).mapv(sigmoid);
        let g = z.slice(s![2 * u..3 * u]).mapv(f64::tanh);
        let o_gate = z.slice(s![3 * u..4 * u]).mapv(sigmoid);

        let c_next = &f_gate * c_prev + &i_gate * &g;
        let h_next = &o_gate * &c_next.mapv(f64::tanh);
        (h_next, c_next)
    }

    /// Hidden state after every step, indexed by time position.
    fn run(&self, seq: &[Array1<f64>], reverse: bool) -> Vec<Array1<f64>> {
        let mut h = Array1::zeros(self.units);
        let mut c = Array1::zeros(self.units);
        let mut outputs = vec![Array1::zeros(self.units); seq.len()];

        let order: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..seq.len()).rev())
        } else {
            Box::new(0..seq.len())
        };
        for t in order {
            let (h_next, c_next) = self.step(&seq[t], &h, &c);
            outputs[t] = h_next.clone();
            h = h_next;
            c = c_next;
        }
        outputs
    }
}

fn concat(a: &Array1<f64>, b: &Array1<f64>) -> Array1<f64> {
    a.iter().chain(b.iter()).copied().collect()
}

#[derive(Debug, Clone)]
pub struct LstmLayer {
    forward: LstmCell,
    backward: Option<LstmCell>,
}

impl LstmLayer {
    pub fn unidirectional(cell: LstmCell) -> Self {
        Self {
            forward: cell,
            backward: None,
        }
    }

    pub fn bidirectional(forward: LstmCell, backward: LstmCell) -> Result<Self> {
        ensure!(
            forward.units() == backward.units() && forward.input_dim() == backward.input_dim(),
            "bidirectional halves disagree: forward {}->{}, backward {}->{}",
            forward.input_dim(),
            forward.units(),
            backward.input_dim(),
            backward.units()
        );
        Ok(Self {
            forward,
            backward: Some(backward),
        })
    }

    pub fn input_dim(&self) -> usize {
        self.forward.input_dim()
    }

    pub fn output_dim(&self) -> usize {
        match self.backward {
            Some(_) => self.forward.units() * 2,
            None => self.forward.units(),
        }
    }

    /// Per-step outputs, as fed to the next recurrent layer.
    fn sequence(&self, seq: &[Array1<f64>]) -> Vec<Array1<f64>> {
        let fwd = self.forward.run(seq, false);
        match &self.backward {
            None => fwd,
            Some(cell) => {
                let bwd = cell.run(seq, true);
                fwd.iter().zip(&bwd).map(|(f, b)| concat(f, b)).collect()
            }
        }
    }

    /// Final summary state: forward after the last step, backward after the first.
    fn final_state(&self, seq: &[Array1<f64>]) -> Array1<f64> {
        let fwd = self.forward.run(seq, false);
        let last = fwd
            .last()
            .cloned()
            .unwrap_or_else(|| Array1::zeros(self.forward.units()));
        match &self.backward {
            None => last,
            Some(cell) => {
                let bwd = cell.run(seq, true);
                let first = bwd
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Array1::zeros(cell.units()));
                concat(&last, &first)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DenseLayer {
    kernel: Array2<f64>,
    bias: Array1<f64>,
}

impl DenseLayer {
    pub fn new(kernel: Array2<f64>, bias: Array1<f64>) -> Result<Self> {
        ensure!(
            kernel.ncols() == bias.len(),
            "dense bias must have {} entries, got {}",
            kernel.ncols(),
            bias.len()
        );
        Ok(Self { kernel, bias })
    }

    fn forward(&self, x: &Array1<f64>) -> Array1<f64> {
        x.dot(&self.kernel) + &self.bias
    }
}

#[derive(Debug, Clone)]
pub struct LstmModel {
    window_len: usize,
    lstm_layers: Vec<LstmLayer>,
    dense_layers: Vec<DenseLayer>,
}

impl LstmModel {
    pub fn new(
        window_len: usize,
        lstm_layers: Vec<LstmLayer>,
        dense_layers: Vec<DenseLayer>,
    ) -> Result<Self> {
        ensure!(window_len > 0, "window length must be positive");
        ensure!(!lstm_layers.is_empty(), "model needs at least one LSTM layer");

        let mut width = 1;
        for (i, layer) in lstm_layers.iter().enumerate() {
            ensure!(
                layer.input_dim() == width,
                "LSTM layer {} expects {} inputs but receives {}",
                i,
                layer.input_dim(),
                width
            );
            width = layer.output_dim();
        }
        for (i, layer) in dense_layers.iter().enumerate() {
            ensure!(
                layer.kernel.nrows() == width,
                "dense layer {} expects {} inputs but receives {}",
                i,
                layer.kernel.nrows(),
                width
            );
            width = layer.kernel.ncols();
        }
        if width != 1 {
            bail!("model must end in a single output, ends in {}", width);
        }

        Ok(Self {
            window_len,
            lstm_layers,
            dense_layers,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ModelFile = serde_json::from_str(json).context("parsing model JSON")?;
        file.try_into()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading model file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("loading model {}", path.display()))
    }
}

impl SequenceModel for LstmModel {
    fn window_len(&self) -> usize {
        self.window_len
    }

    fn predict(&self, window: &[f64]) -> AnalysisResult<f64> {
        if window.len() != self.window_len {
            return Err(AnalysisError::computation(format!(
                "model expects a window of {} values, got {}",
                self.window_len,
                window.len()
            )));
        }

        let mut seq: Vec<Array1<f64>> = window.iter().map(|&v| Array1::from_elem(1, v)).collect();
        let (last, hidden) = self
            .lstm_layers
            .split_last()
            .ok_or_else(|| AnalysisError::computation("model has no LSTM layers"))?;
        for layer in hidden {
            seq = layer.sequence(&seq);
        }
        let mut out = last.final_state(&seq);
        for dense in &self.dense_layers {
            out = dense.forward(&out);
        }

        out.get(0)
            .copied()
            .filter(|v| v.is_finite())
            .ok_or_else(|| AnalysisError::computation("model produced no finite output"))
    }
}

// --- On-disk format ---

#[derive(Debug, Serialize, Deserialize)]
struct CellFile {
    kernel: Vec<Vec<f64>>,
    recurrent_kernel: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LstmLayerFile {
    forward: CellFile,
    #[serde(default)]
    backward: Option<CellFile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DenseFile {
    kernel: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    window_len: usize,
    lstm_layers: Vec<LstmLayerFile>,
    #[serde(default)]
    dense_layers: Vec<DenseFile>,
}

fn to_array2(rows: Vec<Vec<f64>>, what: &str) -> Result<Array2<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    ensure!(
        rows.iter().all(|r| r.len() == ncols),
        "{} has ragged rows",
        what
    );
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat).with_context(|| format!("shaping {}", what))
}

impl TryFrom<CellFile> for LstmCell {
    type Error = anyhow::Error;

    fn try_from(f: CellFile) -> Result<Self> {
        LstmCell::new(
            to_array2(f.kernel, "LSTM kernel")?,
            to_array2(f.recurrent_kernel, "LSTM recurrent kernel")?,
            Array1::from(f.bias),
        )
    }
}

impl TryFrom<ModelFile> for LstmModel {
    type Error = anyhow::Error;

    fn try_from(f: ModelFile) -> Result<Self> {
        let lstm_layers = f
            .lstm_layers
            .into_iter()
            .enumerate()
            .map(|(i, layer)| {
                let forward = LstmCell::try_from(layer.forward)
                    .with_context(|| format!("LSTM layer {} (forward)", i))?;
                match layer.backward {
                    None => Ok(LstmLayer::unidirectional(forward)),
                    Some(b) => {
                        let backward = LstmCell::try_from(b)
                            .with_context(|| format!("LSTM layer {} (backward)", i))?;
                        LstmLayer::bidirectional(forward, backward)
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let dense_layers = f
            .dense_layers
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                DenseLayer::new(to_array2(d.kernel, "dense kernel")?, Array1::from(d.bias))
                    .with_context(|| format!("dense layer {}", i))
            })
            .collect::<Result<Vec<_>>>()?;

        LstmModel::new(f.window_len, lstm_layers, dense_layers)
    }
}
