use firc::driver;
use fir_utils::FirResult;

fn main() -> FirResult<()> {
    driver::run_compiler()
}
