/// RIFF/WAVE export of synthesized samples.

pub mod wav;
