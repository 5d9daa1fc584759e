use std::io::{self, BufRead, BufReader, Read, Write};

/// Runs shorter than this are written out byte by byte.
const MIN_RUN: u32 = 4;
const BYTES_PER_LINE: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HexFileLine {
    Data(Vec<HexFileData>),
    Comment(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HexFileData {
    Byte(u8),
    Run(u32, u8),
}

/// Logisim `v2.0 raw` image: hex bytes, `count*byte` runs, `#` comments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HexFile {
    pub lines: Vec<HexFileLine>,
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

impl HexFile {
    pub const fn header() -> &'static str {
        "v2.0 raw"
    }

    pub fn comment(&mut self, text: &str) {
        self.lines.push(HexFileLine::Comment(text.to_owned()));
    }

    /// Appends `bytes`, collapsing runs of a repeated byte.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let mut line = Vec::new();
        let mut line_bytes = 0;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            let run = bytes[i..].iter().take_while(|x| **x == b).count();
            if run as u32 >= MIN_RUN {
                line.push(HexFileData::Run(run as u32, b));
                line_bytes += BYTES_PER_LINE;
                i += run;
            } else {
                line.push(HexFileData::Byte(b));
                line_bytes += 1;
                i += 1;
            }

            if line_bytes >= BYTES_PER_LINE {
                self.lines.push(HexFileLine::Data(std::mem::take(&mut line)));
                line_bytes = 0;
            }
        }

        if !line.is_empty() {
            self.lines.push(HexFileLine::Data(line));
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> HexFile {
        let mut file = HexFile::default();
        file.push_bytes(bytes);
        file
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for line in &self.lines {
            match line {
                HexFileLine::Comment(_) => {},
                HexFileLine::Data(data) => {
                    for data in data {
                        match data {
                            HexFileData::Byte(b) => bytes.push(*b),
                            HexFileData::Run(count, b) => {
                                for _ in 0..*count {
                                    bytes.push(*b);
                                }
                            }
                        }
                    }
                }
            }
        }

        bytes
    }

    pub fn write<W: Write>(&self, mut w: W) -> Result<(), io::Error> {
        writeln!(w, "{}", HexFile::header())?;
        for line in &self.lines {
            match line {
                HexFileLine::Comment(text) => writeln!(w, "# {}", text)?,
                HexFileLine::Data(data) => {
                    let tokens: Vec<String> = data
                        .iter()
                        .map(|d| match d {
                            HexFileData::Byte(b) => format!("{:02x}", b),
                            HexFileData::Run(count, b) => format!("{}*{:02x}", count, b),
                        })
                        .collect();
                    writeln!(w, "{}", tokens.join(" "))?;
                }
            }
        }
        Ok(())
    }

    pub fn read<R: Read>(r: R) -> Result<HexFile, io::Error> {
        let file = BufReader::new(r);
        let mut lines = file.lines();

        match lines.next() {
            Some(header) => {
                let header = header?;
                if header.trim() != HexFile::header() {
                    return Err(invalid(format!("bad header '{}'", header)));
                }
            }
            None => return Err(invalid("empty hex file".to_owned())),
        }

        let mut parsed = Vec::new();

        for line in lines {
            let line = line?;
            let line = line.trim();

            if let Some(comment) = line.strip_prefix('#') {
                parsed.push(HexFileLine::Comment(comment.trim().to_string()));
                continue;
            }

            let mut data = Vec::new();

            for block in line.split_whitespace() {
                let mut tokens = block.split('*');
                let first = tokens.next().unwrap_or_default();
                let second = tokens.next();

                let parse_byte = |s: &str| {
                    u8::from_str_radix(s, 16).map_err(|e| invalid(format!("bad byte '{}': {}", s, e)))
                };

                data.push(if let Some(value) = second {
                    let count = first
                        .parse::<u32>()
                        .map_err(|e| invalid(format!("bad run length '{}': {}", first, e)))?;
                    HexFileData::Run(count, parse_byte(value)?)
                } else {
                    HexFileData::Byte(parse_byte(first)?)
                });
            }

            if !data.is_empty() {
                parsed.push(HexFileLine::Data(data));
            }
        }

        Ok(HexFile {
            lines: parsed,
        })
    }
}
