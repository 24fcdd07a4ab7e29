use salvo::prelude::*;

use crate::error::SynthesisError;

use super::helpers::get_state;

/// GET /health - Health check
#[handler]
pub async fn health(depot: &mut Depot, res: &mut Response) -> Result<(), SynthesisError> {
    let state = get_state(depot)?;
    res.render(Json(serde_json::json!({
        "status": "healthy",
        "model_loaded": state.model_loaded()
    })));
    Ok(())
}

/// GET / - API information
#[handler]
pub async fn root(res: &mut Response) {
    res.render(Json(serde_json::json!({
        "message": "CSM Audio Generation API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "generate": "/generate",
            "run": "/run",
            "health": "/health"
        }
    })));
}
